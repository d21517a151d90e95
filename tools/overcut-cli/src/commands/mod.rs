pub mod inspect;
pub mod status;
pub mod submit;
