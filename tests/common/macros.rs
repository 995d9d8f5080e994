/// Asserts that an organism with the given ID has at least the specified amount of energy.
#[macro_export]
macro_rules! assert_energy_above {
    ($world:expr, $id:expr, $min_energy:expr) => {
        let organism = $world
            .population()
            .iter()
            .find(|o| o.id == $id)
            .expect("Organism not found in world");
        assert!(
            organism.metabolism.energy > $min_energy,
            "Organism {} energy {} is not above {}",
            $id,
            organism.metabolism.energy,
            $min_energy
        );
    };
}

/// Asserts that an organism with the given ID is no longer in the population.
#[macro_export]
macro_rules! assert_organism_dead {
    ($world:expr, $id:expr) => {
        let exists = $world.population().iter().any(|o| o.id == $id);
        assert!(!exists, "Organism {} should be dead but was found alive", $id);
    };
}

/// Asserts that the population count matches the expected value.
#[macro_export]
macro_rules! assert_population {
    ($world:expr, $count:expr) => {
        assert_eq!(
            $world.population().len(),
            $count,
            "Population count mismatch"
        );
    };
}
