mod console_destination;
mod core;
pub mod filter;
mod memory_destination;
mod registry;
mod trait_;

pub use console_destination::{ConsoleDestination, ConsoleDestinationConfig, ConsoleTarget};
pub use core::{DestinationCore, DestinationOptions};
pub use filter::{Comparison, Filter, FilterKind, FilterOptions, FilterTarget};
pub use memory_destination::{MemoryDestination, MemoryDestinationConfig};
pub use registry::{
    create_destination, is_destination_registered, register_destination, register_destinations,
};
pub use trait_::{Destination, DestinationId};
