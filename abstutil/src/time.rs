use instant::Instant;

pub fn elapsed_seconds(since: Instant) -> f64 {
    let dt = since.elapsed();
    (dt.as_secs() as f64) + (f64::from(dt.subsec_nanos()) * 1e-9)
}

pub fn prettyprint_usize(x: usize) -> String {
    let num = format!("{}", x);
    let mut result = String::new();
    let mut i = num.len();
    for c in num.chars() {
        result.push(c);
        i -= 1;
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
    }
    result
}

fn prettyprint_time(seconds: f64) -> String {
    format!("{:.4}s", seconds)
}

struct TimerSpan {
    name: String,
    started_at: Instant,
}

struct Progress {
    label: String,
    processed_items: usize,
    total_items: usize,
    started_at: Instant,
}

/// Hierarchical timing of phases. Finished spans are printed through `log`, indented by nesting
/// depth. Notes and warnings are collected and dumped when the outermost span finishes.
pub struct Timer {
    outermost_name: String,
    stack: Vec<TimerSpan>,
    progress: Option<Progress>,
    results: Vec<String>,
    notes: Vec<String>,
    warnings: Vec<String>,
    quiet: bool,
}

impl Timer {
    pub fn new<S: Into<String>>(raw_name: S) -> Timer {
        let name = raw_name.into();
        let mut t = Timer {
            outermost_name: name.clone(),
            stack: Vec::new(),
            progress: None,
            results: Vec::new(),
            notes: Vec::new(),
            warnings: Vec::new(),
            quiet: false,
        };
        t.start(name);
        t
    }

    /// A timer that doesn't print anything. Useful for tests and for library calls whose caller
    /// doesn't care.
    pub fn throwaway() -> Timer {
        let mut t = Timer::new("throwaway");
        t.quiet = true;
        t
    }

    pub fn note(&mut self, line: String) {
        if !self.quiet {
            info!("NOTE: {}", line);
        }
        self.notes.push(line);
    }

    pub fn warn(&mut self, line: String) {
        self.warnings.push(line);
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn start<S: Into<String>>(&mut self, raw_name: S) {
        let name = raw_name.into();
        if !self.quiet {
            debug!("{}{}...", "  ".repeat(self.stack.len()), name);
        }
        self.stack.push(TimerSpan {
            name,
            started_at: Instant::now(),
        });
    }

    pub fn stop<S: Into<String>>(&mut self, raw_name: S) {
        let name = raw_name.into();
        let span = match self.stack.pop() {
            Some(span) => span,
            None => panic!("stop({}) called on a Timer with nothing running", name),
        };
        assert_eq!(span.name, name, "Timer spans stopped out of order");
        let line = format!(
            "{}{} took {}",
            "  ".repeat(self.stack.len()),
            name,
            prettyprint_time(elapsed_seconds(span.started_at))
        );
        if !self.quiet {
            info!("{}", line);
        }
        self.results.push(line);
    }

    pub fn start_iter<S: Into<String>>(&mut self, raw_name: S, total_items: usize) {
        if total_items == 0 {
            return;
        }
        if let Some(ref p) = self.progress {
            panic!(
                "Can't start_iter({}) while {} is still in progress",
                raw_name.into(),
                p.label
            );
        }
        self.progress = Some(Progress {
            label: raw_name.into(),
            processed_items: 0,
            total_items,
            started_at: Instant::now(),
        });
    }

    pub fn next(&mut self) {
        let done = {
            let p = match self.progress.as_mut() {
                Some(p) => p,
                None => panic!("Timer::next() called without start_iter()"),
            };
            p.processed_items += 1;
            if p.processed_items > p.total_items {
                panic!(
                    "{} is too few items for {} progress",
                    prettyprint_usize(p.total_items),
                    p.label
                );
            }
            p.processed_items == p.total_items
        };
        if done {
            if let Some(p) = self.progress.take() {
                let line = format!(
                    "{}{} ({})... {}",
                    "  ".repeat(self.stack.len()),
                    p.label,
                    prettyprint_usize(p.total_items),
                    prettyprint_time(elapsed_seconds(p.started_at))
                );
                if !self.quiet {
                    info!("{}", line);
                }
                self.results.push(line);
            }
        }
    }

    /// Runs `cb` over every request using a thread pool, returning results in the same order as
    /// the requests.
    pub fn parallelize<I, O, F>(&mut self, timer_name: &str, requests: Vec<I>, cb: F) -> Vec<O>
    where
        I: Send,
        O: Send,
        F: Fn(I) -> O + Send + Sync,
    {
        self.start_iter(timer_name, requests.len());
        let results = parallelize(requests, cb);
        for _ in 0..results.len() {
            self.next();
        }
        results
    }
}

impl std::ops::Drop for Timer {
    fn drop(&mut self) {
        if std::thread::panicking() {
            return;
        }
        let stop_name = self.outermost_name.clone();
        // Unbalanced spans are a caller bug, but don't blow up while dropping.
        while self.stack.len() > 1 {
            let span = self.stack.pop().map(|s| s.name).unwrap_or_default();
            warn!("Timer {} dropped with {} still running", stop_name, span);
        }
        if !self.stack.is_empty() {
            self.stop(stop_name);
        }
        if self.quiet {
            return;
        }
        if !self.notes.is_empty() {
            info!("{} notes:", self.notes.len());
            for line in &self.notes {
                info!("  {}", line);
            }
        }
        if !self.warnings.is_empty() {
            warn!("{} warnings:", self.warnings.len());
            for line in &self.warnings {
                warn!("  {}", line);
            }
        }
    }
}

/// Runs `cb` over every request on a scoped thread pool sized to the number of CPUs. Results
/// come back in request order.
pub fn parallelize<I, O, F>(requests: Vec<I>, cb: F) -> Vec<O>
where
    I: Send,
    O: Send,
    F: Fn(I) -> O + Send + Sync,
{
    let num_requests = requests.len();
    if num_requests == 0 {
        return Vec::new();
    }
    let cb = &cb;
    let mut results: Vec<Option<O>> = std::iter::repeat_with(|| None)
        .take(num_requests)
        .collect();
    scoped_threadpool::Pool::new(num_cpus::get().max(1) as u32).scoped(|scope| {
        let (tx, rx) = std::sync::mpsc::channel();
        for (idx, req) in requests.into_iter().enumerate() {
            let tx = tx.clone();
            scope.execute(move || {
                // The receiver outlives every job, so this can't fail.
                let _ = tx.send((idx, cb(req)));
            });
        }
        drop(tx);
        for (idx, result) in rx.iter() {
            results[idx] = Some(result);
        }
    });
    results
        .into_iter()
        .map(|x| match x {
            Some(x) => x,
            None => panic!("a parallelized job didn't produce a result"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_numbers() {
        assert_eq!(prettyprint_usize(0), "0");
        assert_eq!(prettyprint_usize(999), "999");
        assert_eq!(prettyprint_usize(1000), "1,000");
        assert_eq!(prettyprint_usize(1234567), "1,234,567");
    }

    #[test]
    fn parallel_results_keep_order() {
        let input: Vec<usize> = (0..50).collect();
        let output = parallelize(input, |x| x * 2);
        assert_eq!(output, (0..50).map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn nested_spans() {
        let mut timer = Timer::throwaway();
        timer.start("outer");
        timer.start("inner");
        timer.stop("inner");
        timer.stop("outer");
        timer.warn("something odd".to_string());
        assert_eq!(timer.warnings().len(), 1);
    }
}
