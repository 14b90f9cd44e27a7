// ============================================
// Exploration Module
// ============================================
//
// Per-user explore/exploit re-ranking with an epsilon-greedy bandit.
//
// Each (user_id, item_id) pair is an arm. Explicit reward feedback updates
// the arm; at recommend time the bandit picks one arm out of the top window
// of the blended ranking and moves it to the front:
// 1. With probability epsilon: uniform random arm (exploration)
// 2. Otherwise: highest average reward, unseen arms count as 0.0
//
// Arm statistics live in process memory. A collaborator that persists
// feedback can replay it through `BanditRanker::restore` at startup.

pub mod epsilon_greedy;
pub mod store;

pub use epsilon_greedy::BanditRanker;
pub use store::BanditStore;
