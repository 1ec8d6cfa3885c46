use super::Individual;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumString, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SelectionStrategy {
    Tournament,
    Roulette,
}

pub fn select<'a>(
    population: &'a [Individual],
    strategy: SelectionStrategy,
    tournament_size: usize,
    rng: &mut fastrand::Rng,
) -> &'a Individual {
    match strategy {
        SelectionStrategy::Tournament => tournament(population, tournament_size, rng),
        SelectionStrategy::Roulette => roulette(population, rng),
    }
}

/// Sample `k` distinct competitors; lowest cost wins.
fn tournament<'a>(
    population: &'a [Individual],
    k: usize,
    rng: &mut fastrand::Rng,
) -> &'a Individual {
    let picks = rng.choose_multiple(0..population.len(), k.min(population.len()));
    picks
        .into_iter()
        .map(|i| &population[i])
        .min_by(|a, b| a.score().total_cmp(&b.score()))
        .expect("non-empty tournament")
}

/// Fitness-proportional selection on inverse cost, so lower cost means a
/// larger wheel slice.
fn roulette<'a>(population: &'a [Individual], rng: &mut fastrand::Rng) -> &'a Individual {
    const EPS: f64 = 1e-10;

    let total: f64 = population.iter().map(|i| 1.0 / (i.score() + EPS)).sum();
    let point = rng.f64() * total;

    let mut acc = 0.0;
    for individual in population {
        acc += 1.0 / (individual.score() + EPS);
        if acc >= point {
            return individual;
        }
    }
    // Numerical slack can leave the point past the last slice.
    population.last().expect("non-empty population")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn population(costs: &[f64]) -> Vec<Individual> {
        costs
            .iter()
            .enumerate()
            .map(|(i, &c)| Individual {
                genes: vec![i as u16 + 1],
                fitness: Some(c),
            })
            .collect()
    }

    #[test]
    fn full_size_tournament_returns_the_global_best() {
        let pop = population(&[50.0, 10.0, 30.0, 20.0]);
        let mut rng = fastrand::Rng::with_seed(7);
        let winner = tournament(&pop, pop.len(), &mut rng);
        assert_eq!(winner.score(), 10.0);
    }

    #[test]
    fn roulette_handles_unscored_individuals() {
        let mut pop = population(&[5.0, 5.0]);
        pop[1].fitness = None; // infinite cost, zero wheel slice
        let mut rng = fastrand::Rng::with_seed(3);
        for _ in 0..50 {
            let picked = roulette(&pop, &mut rng);
            assert_eq!(picked.score(), 5.0);
        }
    }

    #[test]
    fn strategy_names_round_trip() {
        use std::str::FromStr;
        assert_eq!(
            SelectionStrategy::from_str("tournament").unwrap(),
            SelectionStrategy::Tournament
        );
        assert_eq!(SelectionStrategy::Roulette.to_string(), "roulette");
    }
}
