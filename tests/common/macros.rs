/// Asserts that the organism behind a handle is gone from the simulation.
#[macro_export]
macro_rules! assert_organism_dead {
    ($sim:expr, $handle:expr) => {
        let state = $sim.organism($handle);
        assert!(
            state.as_ref().map_or(true, |s| !s.is_alive()),
            "organism {:?} should be dead but is {:?}",
            $handle,
            state
        );
    };
}

/// Asserts the live count of one species.
#[macro_export]
macro_rules! assert_population {
    ($sim:expr, $species:expr, $count:expr) => {
        assert_eq!(
            $sim.population_counts().get($species),
            $count,
            "{} population mismatch",
            $species
        );
    };
}
