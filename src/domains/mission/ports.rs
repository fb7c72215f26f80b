/// Port the mission loader reads the raw mission document through.
/// Adapters provide filesystem or embedded sources.
pub trait MissionSource: Send + Sync {
    /// Human-readable location of the document, used in log lines.
    fn location(&self) -> String;

    fn read_mission(&self) -> std::io::Result<String>;
}
