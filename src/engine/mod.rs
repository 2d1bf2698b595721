mod reconcile;

pub use reconcile::{reconcile, title_matches};
