pub mod analyze;
pub mod home;
pub mod json_error;
pub mod system;
pub mod trends;
pub mod wardrobe;
