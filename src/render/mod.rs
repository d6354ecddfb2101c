//! HTML rendering.
//!
//! Pages are produced by plain template substitution: every downstream
//! payload arrives already resolved to text (real content or fallback), and
//! the only conditional output is the presence or absence of optional
//! sections.

pub mod page;
pub mod stars;
pub mod topology;

pub use page::{escape_html, page, service_page};
pub use stars::render_stars;
pub use topology::ServiceTopology;
