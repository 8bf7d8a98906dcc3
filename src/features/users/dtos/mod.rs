mod favorite_dto;
mod profile_dto;

pub use favorite_dto::*;
pub use profile_dto::*;
