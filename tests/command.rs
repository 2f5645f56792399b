mod tests {
    use led_slave_engine::color::Pixel;
    use led_slave_engine::command::{
        CMD_CLEAR, CMD_LED_TYPE, CMD_POWER_CTL, CMD_RAINBOW, CMD_SET_LED_COLOR, CMD_SHOW, Command,
    };

    #[test]
    fn test_arg_len_table() {
        let arities = [
            (1, 0),
            (2, 0),
            (3, 1),
            (4, 1),
            (5, 2),
            (6, 1),
            (7, 1),
            (8, 5),
            (9, 4),
            (10, 4),
            (11, 1),
            (12, 0),
            (13, 0),
            (14, 0),
        ];
        for (code, arity) in arities {
            assert_eq!(Command::arg_len(code), Some(arity), "code {code}");
        }
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        assert_eq!(Command::arg_len(0), None);
        assert_eq!(Command::arg_len(15), None);
        assert_eq!(Command::arg_len(255), None);
        assert_eq!(Command::parse(&[0]), None);
        assert_eq!(Command::parse(&[99, 1, 2, 3]), None);
    }

    #[test]
    fn test_empty_payload_is_rejected() {
        assert_eq!(Command::parse(&[]), None);
    }

    #[test]
    fn test_insufficient_args_are_rejected() {
        assert_eq!(Command::parse(&[CMD_SET_LED_COLOR, 2, 255, 0, 0]), None);
        assert_eq!(Command::parse(&[CMD_LED_TYPE, 0x00]), None);
        assert_eq!(Command::parse(&[CMD_POWER_CTL]), None);
    }

    #[test]
    fn test_zero_arg_commands() {
        assert_eq!(Command::parse(&[CMD_SHOW]), Some(Command::Show));
        assert_eq!(Command::parse(&[CMD_CLEAR]), Some(Command::Clear));
        assert_eq!(Command::parse(&[CMD_RAINBOW]), Some(Command::Rainbow));
    }

    #[test]
    fn test_set_pixel_parses_index_and_color() {
        assert_eq!(
            Command::parse(&[CMD_SET_LED_COLOR, 2, 255, 0, 0, 128]),
            Some(Command::SetPixel {
                index: 2,
                color: Pixel::new(255, 0, 0, 128),
            })
        );
    }

    #[test]
    fn test_type_word_is_big_endian() {
        assert_eq!(
            Command::parse(&[CMD_LED_TYPE, 0x01, 0x52]),
            Some(Command::SetPixelType(0x0152))
        );
    }

    #[test]
    fn test_power_flag() {
        assert_eq!(
            Command::parse(&[CMD_POWER_CTL, 1]),
            Some(Command::Power { on: true })
        );
        assert_eq!(
            Command::parse(&[CMD_POWER_CTL, 0]),
            Some(Command::Power { on: false })
        );
        // Any non-zero value counts as on.
        assert_eq!(
            Command::parse(&[CMD_POWER_CTL, 42]),
            Some(Command::Power { on: true })
        );
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        assert_eq!(Command::parse(&[CMD_SHOW, 7, 7, 7]), Some(Command::Show));
    }
}
