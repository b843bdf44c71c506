//! Tests for step capture and GIF export

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::io::BufReader;

    use image::AnimationDecoder;
    use image::codecs::gif::GifDecoder;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::TempDir;
    use tilewave::GenerationError;
    use tilewave::Grid;
    use tilewave::algorithm::socket::Socket;
    use tilewave::io::graphics::TileAtlas;
    use tilewave::io::visualization::VisualizationCapture;
    use tilewave::spatial::tiles::TileDefinition;

    // One frame before the first step and one after each of the nine steps
    fn captured_run() -> (VisualizationCapture, TileAtlas) {
        let mut grid = Grid::new(
            3,
            vec![TileDefinition::uniform("block", [Socket::symmetric("a")]).rotatable()],
        )
        .unwrap();
        let atlas = TileAtlas::swatches(grid.catalog(), 4).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let mut capture = VisualizationCapture::new(9);
        capture.record(grid.snapshot());
        while grid.collapse_one_step(&mut rng).unwrap().is_some() {
            capture.record(grid.snapshot());
        }
        (capture, atlas)
    }

    // Tests VisualizationCapture construction
    // Verified by initializing with a recorded frame
    #[test]
    fn test_capture_new() {
        let capture = VisualizationCapture::new(10);
        assert_eq!(capture.frame_count(), 0);
        assert_eq!(VisualizationCapture::default().frame_count(), 0);
    }

    // Tests recording and clearing frames
    // Verified by removing the clear body
    #[test]
    fn test_record_and_clear() {
        let (mut capture, _) = captured_run();
        assert_eq!(capture.frame_count(), 10);
        capture.clear();
        assert_eq!(capture.frame_count(), 0);
    }

    // Tests error when exporting without frames
    // Verified by removing the empty frames check
    #[test]
    fn test_export_gif_without_frames() {
        let atlas = TileAtlas::new(4).unwrap();
        let capture = VisualizationCapture::new(0);
        let temp_dir = TempDir::new().unwrap();
        assert!(matches!(
            capture.export_gif(&atlas, temp_dir.path().join("empty.gif"), 50),
            Err(GenerationError::Precondition { .. })
        ));
    }

    // Tests fast playback skips frames but keeps the last one
    // Verified by exporting every frame regardless of delay
    #[test]
    fn test_export_gif_skips_fast_frames() {
        let (capture, atlas) = captured_run();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("steps.gif");

        capture.export_gif(&atlas, &path, 20).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        let frames = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(frames.len(), 4, "frames 0, 3, 6 and the final frame 9");
        assert_eq!(frames[0].buffer().dimensions(), (12, 12));
    }

    // Tests slow playback keeps every frame
    // Verified by always skipping every other frame
    #[test]
    fn test_export_gif_keeps_slow_frames() {
        let (capture, atlas) = captured_run();
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slow").join("steps.gif");

        capture.export_gif(&atlas, &path, 80).unwrap();

        let decoder = GifDecoder::new(BufReader::new(File::open(&path).unwrap())).unwrap();
        assert_eq!(decoder.into_frames().count(), 10);
    }
}
