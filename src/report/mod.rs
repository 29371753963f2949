mod formatter;

pub use formatter::PathwayFormatter;
