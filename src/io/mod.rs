pub mod demand;
pub mod leaderboard;
pub mod replay;
pub mod reporting;
