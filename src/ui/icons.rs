pub struct Icons;

impl Icons {
    pub const TROPHY: &str = "🏆";
    pub const CHECK: &str = "✅";
    pub const WARN: &str = "⚠️";
    pub const INFO: &str = "ℹ️";
    pub const STATS: &str = "📊";
    pub const PERSON: &str = "👤";
    pub const IMPORT: &str = "📥";
    pub const HISTORY: &str = "📜";
    pub const DEL: &str = "🗑️";
    pub const EMPTY: &str = "∅";
}
