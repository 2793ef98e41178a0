use crate::Timer;

// - If it doesn't make sense to plumb Timer to a library call, return Warn<T>.
// - If a Timer is available and there's a Warn<T>, use get() or with_context().
// - If a Timer is available and something goes wrong, directly call warn().
pub struct Warn<T> {
    value: T,
    warnings: Vec<String>,
}

impl<T> Warn<T> {
    pub fn ok(value: T) -> Warn<T> {
        Warn {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn warn(value: T, warning: String) -> Warn<T> {
        Warn {
            value,
            warnings: vec![warning],
        }
    }

    pub fn warnings(value: T, warnings: Vec<String>) -> Warn<T> {
        Warn { value, warnings }
    }

    pub fn warning_lines(&self) -> &[String] {
        &self.warnings
    }

    /// Log every warning and return the value.
    pub fn unwrap(self) -> T {
        for line in self.warnings {
            warn!("{}", line);
        }
        self.value
    }

    pub fn get(self, timer: &mut Timer) -> T {
        for line in self.warnings {
            timer.warn(line);
        }
        self.value
    }

    pub fn with_context(self, timer: &mut Timer, context: String) -> T {
        for line in self.warnings {
            timer.warn(format!("{}: {}", context, line));
        }
        self.value
    }

    pub fn map<O, F: FnOnce(T) -> O>(self, f: F) -> Warn<O> {
        Warn {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}

