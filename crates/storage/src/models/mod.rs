mod athlete;
mod competition;
mod discipline;
mod entry;
mod guess;
mod player;

pub use athlete::Athlete;
pub use competition::{Competition, CompetitionStatus, PREDICTION_DEADLINE_MINUTES};
pub use discipline::Discipline;
pub use entry::Entry;
pub use guess::{Guess, PointsState};
pub use player::Player;
