//! Output formatting helpers for command results.

use std::collections::HashSet;
use std::fmt::Display;
use std::io::{self, Write};

use crate::{model::Listed, sets};

/// Print `name: value`.
pub(super) fn print_entry(out: &mut dyn Write, name: &str, value: impl Display) -> io::Result<()> {
    writeln!(out, "{name}: {value}")
}

/// Print `name: a b c` with the set in sorted order.
pub(super) fn print_set(out: &mut dyn Write, name: &str, set: &HashSet<String>) -> io::Result<()> {
    print_entry(out, name, sets::join(set))
}

/// Print one listing row, flagging corrupt records.
pub(super) fn print_listed<T>(
    out: &mut dyn Write,
    listed: &Listed<T>,
    render: impl FnOnce(&mut dyn Write, &T) -> io::Result<()>,
) -> io::Result<()> {
    match listed {
        Listed::Record(record) => render(out, record),
        Listed::Corrupt { name } => writeln!(out, "{name} [CORRUPT ENTRY]"),
    }
}

/// Print how many records a bulk delete removed.
pub(super) fn print_deleted(
    out: &mut dyn Write,
    count: u64,
    singular: &str,
    plural: &str,
) -> io::Result<()> {
    if count == 1 {
        writeln!(out, "Deleted 1 {singular}")
    } else {
        writeln!(out, "Deleted {count} {plural}")
    }
}
