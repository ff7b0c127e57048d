pub mod dispatch;
pub mod memory;
pub mod port;

pub use dispatch::{spawn_dispatcher, DispatchStats, Dispatcher};
pub use memory::{Address, Eeprom};
pub use port::{channel, BusSampler, ChannelPort, SamplerPort};

pub use picoprom_common::{Direction, Transaction, EEPROM_SIZE};
