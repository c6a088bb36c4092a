mod text;

pub use text::excerpt;
