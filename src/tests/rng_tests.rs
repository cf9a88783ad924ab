#[cfg(test)]
mod tests {
    use crate::rng::LcgRng;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = LcgRng::new(12345);
        let mut b = LcgRng::new(12345);

        for _ in 0..1000 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut a = LcgRng::new(12345);
        let mut b = LcgRng::new(54321);

        // The multiplier is odd, so distinct states stay distinct
        assert_ne!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_floats_in_unit_interval() {
        let mut rng = LcgRng::new(7);

        for _ in 0..10_000 {
            let value = rng.next_f64();
            assert!((0.0..1.0).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn test_zero_seed_still_advances() {
        let mut rng = LcgRng::new(0);

        // The additive constant keeps a zero state from sticking
        assert_eq!(rng.next_u32(), 1_013_904_223);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_state_tracks_last_output() {
        let mut rng = LcgRng::new(99);
        let out = rng.next_u32();
        assert_eq!(out, rng.state());
    }
}
