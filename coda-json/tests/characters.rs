use coda_json::character::{
    END, is_control, is_digit, is_hex_digit, is_value_boundary, is_whitespace, parse_hex_digit,
};
use coda_testhelpers::test;

#[test]
fn classifiers_are_total_over_latin1() {
    for code in 0u8..=255 {
        let c = Some(char::from(code));

        assert_eq!(is_control(c), code < 0x20, "is_control({code:#04x})");
        assert_eq!(is_digit(c), code.is_ascii_digit(), "is_digit({code:#04x})");
        assert_eq!(
            is_hex_digit(c),
            code.is_ascii_hexdigit(),
            "is_hex_digit({code:#04x})"
        );
        assert_eq!(
            is_whitespace(c),
            matches!(code, b' ' | b'\t' | b'\n' | b'\r'),
            "is_whitespace({code:#04x})"
        );
        assert_eq!(
            is_value_boundary(c),
            matches!(code, b' ' | b'\t' | b'\n' | b'\r' | b',' | b':' | b'[' | b']' | b'{' | b'}'),
            "is_value_boundary({code:#04x})"
        );

        match parse_hex_digit(c) {
            Ok(value) => {
                assert!(code.is_ascii_hexdigit());
                assert_eq!(u32::from(value), char::from(code).to_digit(16).unwrap());
            }
            Err(_) => assert!(!code.is_ascii_hexdigit()),
        }
    }
}

#[test]
fn end_of_input() {
    assert!(!is_control(END));
    assert!(!is_digit(END));
    assert!(!is_hex_digit(END));
    assert!(!is_whitespace(END));
    assert!(is_value_boundary(END));

    let err = parse_hex_digit(END).unwrap_err();
    assert_eq!(err.kind.code(), "json::invalid_character");
}
