use ops_core::ProcessSummary;

pub struct ProcessTable {
    pid_width: usize,
    name_width: usize,
    cpu_width: usize,
    memory_width: usize,
    status_width: usize,
}

impl ProcessTable {
    pub fn new(processes: &[ProcessSummary]) -> Self {
        let name_width = processes
            .iter()
            .map(|p| p.name.chars().count())
            .max()
            .unwrap_or(16)
            .clamp(4, 40); // Between "Name" header min and reasonable terminal width max

        let pid_width = processes
            .iter()
            .map(|p| p.pid.to_string().len())
            .max()
            .unwrap_or(5)
            .max(3);

        Self {
            pid_width,
            name_width,
            cpu_width: 7,
            memory_width: 10,
            status_width: 8,
        }
    }

    pub fn print_table(&self, processes: &[ProcessSummary]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!("{}", self.header_row());
        println!("{}", self.border('├', '┼', '┤'));
        for process in processes {
            println!("{}", self.row(process));
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:>width_pid$} │ {:<width_name$} │ {:>width_cpu$} │ {:>width_memory$} │ {:<width_status$} │",
            "PID",
            "Name",
            "CPU %",
            "Memory MB",
            "Status",
            width_pid = self.pid_width,
            width_name = self.name_width,
            width_cpu = self.cpu_width,
            width_memory = self.memory_width,
            width_status = self.status_width,
        )
    }

    fn row(&self, process: &ProcessSummary) -> String {
        format!(
            "│ {:>width_pid$} │ {} │ {:>width_cpu$.1} │ {:>width_memory$} │ {} │",
            process.pid,
            truncate(&process.name, self.name_width),
            process.cpu_usage_percent,
            process.memory_mb(),
            truncate(&process.status, self.status_width),
            width_pid = self.pid_width,
            width_cpu = self.cpu_width,
            width_memory = self.memory_width,
        )
    }

    fn border(&self, left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = [
            self.pid_width,
            self.name_width,
            self.cpu_width,
            self.memory_width,
            self.status_width,
        ]
        .iter()
        .map(|width| "─".repeat(width + 2))
        .collect();

        format!(
            "{}{}{}",
            left,
            segments.join(&middle.to_string()),
            right
        )
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings
/// including emoji and multi-byte characters.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
