pub mod gains;
pub mod leaderboards;
pub mod players;
