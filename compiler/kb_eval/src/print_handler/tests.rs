use super::*;

#[test]
fn buffer_println_appends_newline() {
    let handler = buffer_handler();
    handler.println("hello");
    assert_eq!(handler.output(), "hello\n");
}

#[test]
fn buffer_print_keeps_text_verbatim() {
    let handler = buffer_handler();
    handler.print("a");
    handler.print("b");
    handler.println("");
    assert_eq!(handler.output(), "ab\n");
}

#[test]
fn buffer_clear_empties_output() {
    let handler = buffer_handler();
    handler.println("hello");
    handler.clear();
    assert!(handler.output().is_empty());
}

#[test]
fn silent_handler_discards_output() {
    let handler = silent_handler();
    handler.println("hello");
    handler.print("world");
    assert_eq!(handler.output(), "");
}

#[test]
fn stdout_handler_captures_nothing() {
    assert_eq!(stdout_handler().output(), "");
}

#[test]
fn clones_share_the_buffer() {
    let handler = buffer_handler();
    let host_view = Arc::clone(&handler);
    handler.print("shared");
    assert_eq!(host_view.output(), "shared");
}
