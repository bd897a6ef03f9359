pub mod catalog;
pub mod competitions;
pub mod guesses;
pub mod leaderboard;
pub mod players;
