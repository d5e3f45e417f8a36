pub mod events;
pub mod fixtures;
pub mod game_result;
pub mod player;
pub mod team;

pub use events::{
    AtBatLog, GameEvent, Half, PitchRecord, PitchResult, PitchingChange, PlateAppearanceEvent, PlateAppearanceResult,
    RunScored, TeamSide,
};
pub use game_result::{BatterLine, GameResult, InningLine, PitcherLine, TeamTotals};
pub use player::{
    BatSide, BatterAbilities, FielderAbilities, Pitch, PitchType, PitcherAbilities, Player, PlayerId, Position,
};
pub use team::{LineupSlot, PitcherUsageConfig, RelieverPolicy, StarterPolicy, Team, UsagePolicy, LINEUP_SIZE};
