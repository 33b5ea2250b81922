// Application message protocol carried over the M16 modem link
pub mod codec;
pub mod command;
pub mod layout;

pub use codec::{Codec, CodecError, Message, WireWord};
pub use command::Command;
pub use layout::BitLayout;
