pub mod ghost_list;
pub mod intrusive_list;
pub mod slot_arena;

pub use ghost_list::GhostList;
pub use intrusive_list::IntrusiveList;
pub use slot_arena::{SlotArena, SlotId};
