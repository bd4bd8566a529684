mod handler;
mod model;

pub use handler::{dashboard, get_profile, put_profile, students};
pub use model::HelperProfile;
