//! Tests for per-stage progress tracking

#[cfg(test)]
mod tests {
    use seamtile::algorithm::executor::Stage;
    use seamtile::io::progress::ProgressManager;
    use std::path::Path;

    // Tests the completed file counter across files
    // Verified by counting stage ticks as files
    #[test]
    fn test_completed_files_counted() {
        let mut manager = ProgressManager::new();
        manager.initialize(2);

        for index in 0..2 {
            manager.start_file(index, Path::new("pattern.png"));
            for stage in Stage::ALL {
                manager.stage(stage);
            }
            manager.complete_file();
        }

        assert_eq!(manager.completed(), 2);
        manager.finish();
    }

    // Tests re-initialization resets the counter
    // Verified by keeping the previous count
    #[test]
    fn test_initialize_resets() {
        let mut manager = ProgressManager::default();
        manager.initialize(1);
        manager.complete_file();
        assert_eq!(manager.completed(), 1);

        manager.initialize(3);
        assert_eq!(manager.completed(), 0);
    }
}
