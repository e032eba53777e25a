//! Database entities

pub mod candidacy;
pub mod election;
pub mod point;
pub mod polling_table;
pub mod position;
pub mod precinct;
pub mod section;
pub mod vote;
pub mod voter;

pub use candidacy::Entity as Candidacy;
pub use election::Entity as Election;
pub use point::Entity as Point;
pub use polling_table::Entity as PollingTable;
pub use position::Entity as Position;
pub use precinct::Entity as Precinct;
pub use section::Entity as Section;
pub use vote::Entity as Vote;
pub use voter::Entity as Voter;
