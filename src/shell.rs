use crate::builtins::Builtin;
use crate::command::{self, CommandRecord};
use crate::config::Config;
use crate::error::ShellError;
use crate::input::LineSource;
use crate::jobs::JobManager;
use crate::process::{self, Outcome};
use crate::prompt::Prompt;
use crate::signal_handler::{foreground_only, DispositionSet};
use crate::status::ExitStatus;
use tracing::debug;

pub struct Shell<S: LineSource> {
    config: Config,
    prompt: Prompt,
    source: S,
    job_manager: JobManager,
    /// Completion of the last foreground command; what `status` reports.
    last_status: ExitStatus,
    running: bool,
}

impl<S: LineSource> Shell<S> {
    pub fn new(config: Config, source: S) -> Self {
        let job_manager = JobManager::with_capacity_limit(config.job_capacity);
        Self {
            config,
            prompt: Prompt::new(),
            source,
            job_manager,
            last_status: ExitStatus::default(),
            running: true,
        }
    }

    #[cfg(test)]
    pub fn last_status(&self) -> ExitStatus {
        self.last_status
    }

    #[cfg(test)]
    pub fn jobs(&self) -> &JobManager {
        &self.job_manager
    }

    /// Drive prompt cycles until `exit`, end of input, or a fatal error.
    pub fn run(&mut self) -> Result<(), ShellError> {
        DispositionSet::INTERPRETER.apply().map_err(ShellError::Signals)?;

        while self.running {
            if let Err(e) = self.run_cycle() {
                if e.is_fatal() {
                    self.job_manager.kill_all();
                    return Err(e);
                }
                eprintln!("smallsh: {}", e);
            }
        }
        Ok(())
    }

    fn run_cycle(&mut self) -> Result<(), ShellError> {
        let record = match self.next_record()? {
            Some(record) => record,
            None => {
                debug!("end of input");
                self.exit_record()
            }
        };

        let result = self.dispatch(&record);
        if self.running {
            self.reap_background();
        }
        result
    }

    /// Read until a line yields a command. `None` means end of input.
    fn next_record(&mut self) -> Result<Option<CommandRecord>, ShellError> {
        let prompt = self.prompt.get_string();
        loop {
            let Some(line) = self.source.read_line(&prompt).map_err(ShellError::Input)? else {
                return Ok(None);
            };
            let parsed = command::parse(&line, foreground_only(), self.last_status, self.config.arg_limit)?;
            if let Some(record) = parsed {
                return Ok(Some(record));
            }
        }
    }

    fn exit_record(&self) -> CommandRecord {
        CommandRecord {
            argv: vec!["exit".to_string()],
            arg_count: 0,
            input_path: None,
            output_path: None,
            background: false,
            last_status: self.last_status,
        }
    }

    fn dispatch(&mut self, record: &CommandRecord) -> Result<(), ShellError> {
        if let Some(builtin) = Builtin::lookup(record.program()) {
            self.running = builtin.execute(record, &mut self.job_manager);
            return Ok(());
        }

        match process::run_external(record, &mut self.job_manager)? {
            Outcome::Foreground(status) => self.last_status = status,
            Outcome::Background(_) => {}
        }
        Ok(())
    }

    /// Report finished background jobs. Their status never replaces
    /// `last_status`, which belongs to the foreground.
    fn reap_background(&mut self) {
        for done in self.job_manager.sweep() {
            println!("background pid {} is done: {}", done.pid, done.status.describe());
        }
    }
}
