use super::{byte_len, string_value, unquote, Argument, Directive};

#[test]
fn string_byte_counts() {
    assert_eq!(byte_len(r#""\x41\x42""#), 2);
    assert_eq!(byte_len(r#""AB""#), 2);
    assert_eq!(byte_len(r#""\n""#), 1);
    assert_eq!(byte_len(r#""""#), 0);
    assert_eq!(byte_len(r#""a\"b\\""#), 4);
}

#[test]
fn escapes() {
    assert_eq!(unquote(r#""\b\f\n\r\t\v""#), [8, 12, 10, 13, 9, 11]);
    assert_eq!(unquote(r"'\''"), [b'\'']);
    assert_eq!(unquote(r#""\XfF\x00""#), [0xFF, 0]);
    assert_eq!(unquote("'é'"), [0xE9]);
    assert_eq!(unquote("'€'"), [0]);
}

#[test]
fn string_words_are_big_endian() {
    assert_eq!(string_value(r#""AB""#), 0x4142);
    assert_eq!(string_value(r#""A""#), 0x41);
    assert_eq!(string_value(r#""\xFF\xFE""#), 0xFFFE);
    assert_eq!(string_value(r#""""#), 0);
}

#[test]
fn argument_values() {
    assert_eq!(Argument::Dec(65535).value(), Some(65535));
    assert_eq!(Argument::Hex(0x10).value(), Some(16));
    assert_eq!(Argument::Char(r"'\n'".into()).value(), Some(10));
    assert_eq!(Argument::Str(r#""hi""#.into()).value(), Some(0x6869));
}

#[test]
fn directive_names() {
    assert_eq!(Directive::from_name("addrss"), Some(Directive::Addrss));
    assert_eq!(Directive::from_name("EqUaTe"), Some(Directive::Equate));
    assert_eq!(Directive::from_name("ADDRESS"), None);
    assert_eq!(Directive::Block.to_string(), ".BLOCK");
}
