pub mod border;
pub mod chunk;
pub mod codec;
pub mod image;
pub mod layout;
pub mod numeric;
pub mod pixel;
pub mod smart_pixel;
pub mod utils;
