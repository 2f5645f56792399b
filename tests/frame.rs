mod tests {
    use led_slave_engine::color::{Pixel, PixelLayout};
    use led_slave_engine::frame::FrameBuffer;

    // G,R,B,W transmit order at 800 kHz (the compiled-in default).
    const GRBW: u16 = 0x00D2;
    // G,R,B without a white channel.
    const GRB: u16 = 0x0052;

    #[test]
    fn test_layout_grbw() {
        let layout = PixelLayout::from_type_word(GRBW);
        assert_eq!(layout.bytes_per_pixel(), 4);

        let pixel = Pixel::new(1, 2, 3, 4);
        assert_eq!(layout.byte_of(pixel, 0), 2);
        assert_eq!(layout.byte_of(pixel, 1), 1);
        assert_eq!(layout.byte_of(pixel, 2), 3);
        assert_eq!(layout.byte_of(pixel, 3), 4);
    }

    #[test]
    fn test_layout_grb_has_three_bytes() {
        let layout = PixelLayout::from_type_word(GRB);
        assert_eq!(layout.bytes_per_pixel(), 3);

        let pixel = Pixel::new(1, 2, 3, 4);
        assert_eq!(layout.byte_of(pixel, 0), 2);
        assert_eq!(layout.byte_of(pixel, 1), 1);
        assert_eq!(layout.byte_of(pixel, 2), 3);
    }

    #[test]
    fn test_layout_ignores_rate_byte() {
        assert_eq!(
            PixelLayout::from_type_word(GRBW),
            PixelLayout::from_type_word(GRBW | 0x0100)
        );
    }

    #[test]
    fn test_set_byte_round_trip() {
        let layout = PixelLayout::from_type_word(GRBW);
        let mut pixel = Pixel::OFF;
        for offset in 0..4 {
            layout.set_byte(&mut pixel, offset, offset + 10);
        }
        for offset in 0..4 {
            assert_eq!(layout.byte_of(pixel, offset), offset + 10);
        }
        assert_eq!(pixel, Pixel::new(11, 10, 12, 13));
    }

    #[test]
    fn test_byte_mapping_matches_pixels() {
        let layout = PixelLayout::from_type_word(GRBW);
        let mut frame = FrameBuffer::<4>::new(layout, 4, Pixel::OFF);
        frame.set_pixel(2, Pixel::new(255, 0, 0, 128));

        // Register 3 occupies bytes 8..12: g, r, b, w.
        assert_eq!(frame.read_byte(8), 0);
        assert_eq!(frame.read_byte(9), 255);
        assert_eq!(frame.read_byte(10), 0);
        assert_eq!(frame.read_byte(11), 128);
    }

    #[test]
    fn test_write_bytes_form_pixel() {
        let layout = PixelLayout::from_type_word(GRBW);
        let mut frame = FrameBuffer::<4>::new(layout, 4, Pixel::OFF);
        for (offset, value) in [(0, 20), (1, 10), (2, 30), (3, 40)] {
            frame.write_byte(offset, value);
        }
        assert_eq!(frame.pixel(0), Some(Pixel::new(10, 20, 30, 40)));
    }

    #[test]
    fn test_out_of_span_access_is_rejected() {
        let layout = PixelLayout::from_type_word(GRBW);
        let mut frame = FrameBuffer::<4>::new(layout, 2, Pixel::OFF);
        assert_eq!(frame.byte_len(), 8);

        frame.write_byte(8, 0xFF);
        assert_eq!(frame.read_byte(8), 0);
        assert_eq!(frame.pixel(2), None);
        assert!(!frame.set_pixel(2, Pixel::new(1, 1, 1, 1)));
        assert_eq!(frame.pixels().len(), 2);
    }

    #[test]
    fn test_led_count_clamps_to_capacity() {
        let layout = PixelLayout::from_type_word(GRBW);
        let mut frame = FrameBuffer::<4>::new(layout, 2, Pixel::OFF);
        assert_eq!(frame.set_led_count(200), 4);
        assert_eq!(frame.led_count(), 4);
        assert_eq!(frame.byte_len(), 16);
    }

    #[test]
    fn test_new_fills_configured_span_with_initial_color() {
        let layout = PixelLayout::from_type_word(GRBW);
        let boot = Pixel::new(0, 0, 0, 32);
        let mut frame = FrameBuffer::<4>::new(layout, 2, boot);
        assert_eq!(frame.pixel(0), Some(boot));
        assert_eq!(frame.pixel(1), Some(boot));

        // Pixels past the boot count start dark.
        frame.set_led_count(4);
        assert_eq!(frame.pixel(2), Some(Pixel::OFF));
    }

    #[test]
    fn test_fill_and_clear() {
        let layout = PixelLayout::from_type_word(GRBW);
        let mut frame = FrameBuffer::<4>::new(layout, 4, Pixel::OFF);
        let color = Pixel::new(5, 6, 7, 8);
        frame.fill(color);
        assert!(frame.pixels().iter().all(|&led| led == color));

        frame.clear();
        assert!(frame.pixels().iter().all(|&led| led == Pixel::OFF));
    }

    #[test]
    fn test_layout_change_remaps_bytes() {
        let mut frame = FrameBuffer::<4>::new(PixelLayout::from_type_word(GRBW), 4, Pixel::OFF);
        frame.set_pixel(1, Pixel::new(10, 20, 30, 40));

        frame.set_layout(PixelLayout::from_type_word(GRB));
        assert_eq!(frame.byte_len(), 12);
        // Register 2 now occupies bytes 3..6: g, r, b.
        assert_eq!(frame.read_byte(3), 20);
        assert_eq!(frame.read_byte(4), 10);
        assert_eq!(frame.read_byte(5), 30);
    }
}
