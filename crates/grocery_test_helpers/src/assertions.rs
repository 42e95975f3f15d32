//! Predicates over the CLI's rendered list
//!
//! The `grocery` binary prints one line per item, `[x]` or `[ ]` followed by
//! the id and the text, and a footer such as `3 List items`.

use predicates::prelude::*;

/// Rendered line for one item
pub fn item_line(id: u64, text: &str, checked: bool) -> String {
    let mark = if checked { "x" } else { " " };
    format!("[{}] {:>3}  {}", mark, id, text)
}

/// Output lists the given item
///
/// # Example
/// ```rust
/// use grocery_test_helpers::assertions::lists_item;
/// use predicates::prelude::*;
///
/// let output = "[ ]   1  Bread\n1 List item\n";
/// assert!(lists_item(1, "Bread", false).eval(output));
/// assert!(!lists_item(1, "Bread", true).eval(output));
/// ```
pub fn lists_item(id: u64, text: &str, checked: bool) -> impl Predicate<str> {
    let line = item_line(id, text, checked);
    predicate::function(move |s: &str| s.lines().any(|l| l == line))
}

/// Output mentions no item with this id
pub fn omits_item(id: u64) -> impl Predicate<str> {
    let checked = format!("[x] {:>3}  ", id);
    let unchecked = format!("[ ] {:>3}  ", id);
    predicate::function(move |s: &str| {
        !s.lines()
            .any(|l| l.starts_with(&checked) || l.starts_with(&unchecked))
    })
}

/// Output ends with the footer for `count` items
pub fn footer_count(count: usize) -> impl Predicate<str> {
    let noun = if count == 1 { "item" } else { "items" };
    let footer = format!("{} List {}", count, noun);
    predicate::function(move |s: &str| s.lines().last() == Some(footer.as_str()))
}
