/// Fields of `/proc/loadavg`, kept as the kernel wrote them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadAverage {
    pub one: String,
    pub five: String,
    pub fifteen: String,
    /// `runnable/total` scheduling entities.
    pub entities: String,
    pub last_pid: String,
}

impl std::fmt::Display for LoadAverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            " {} {} {} {} {}",
            self.one, self.five, self.fifteen, self.entities, self.last_pid
        )
    }
}
