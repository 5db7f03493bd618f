//! Tests for per-model sampling progress bars

#[cfg(test)]
mod tests {
    use prefsample::io::progress::SamplingProgress;

    // Tests the status names the phase of the completed iteration
    // Verified by switching to sampling one iteration early
    #[test]
    fn test_status_phase() {
        let progress = SamplingProgress::hidden(10, 10);

        assert_eq!(progress.status(1, 0), "tuning");
        assert_eq!(progress.status(10, 0), "tuning");
        assert_eq!(progress.status(11, 0), "sampling");
        progress.finish();
    }

    // Tests divergences after tuning still reach the status text
    // Verified by reporting warmup divergences only
    #[test]
    fn test_status_counts_divergences() {
        let progress = SamplingProgress::hidden(10, 10);

        assert_eq!(progress.status(4, 1), "tuning (1 divergences)");
        assert_eq!(progress.status(18, 3), "sampling (3 divergences)");
        progress.update(18, 3);
        progress.finish();
    }

    // Tests a run without tuning starts in the sampling phase
    // Verified by treating iteration zero as tuning
    #[test]
    fn test_status_without_tuning() {
        let progress = SamplingProgress::hidden(0, 5);
        assert_eq!(progress.status(1, 0), "sampling");
        progress.finish();
    }

    // Tests a visible bar can be created, updated and cleared
    // Verified by panicking on an unparsable template
    #[test]
    fn test_visible_progress() {
        let progress = SamplingProgress::new("ICAR model", 4, 6);
        progress.update(10, 0);
        progress.finish();
    }
}
