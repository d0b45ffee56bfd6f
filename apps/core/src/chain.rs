//! Ordered fallback chains: try each named strategy in turn, first accepted result wins.

use tracing::debug;

/// A named, pure step in a fallback chain.
pub struct Strategy<I: ?Sized, O> {
    pub name: &'static str,
    pub run: fn(&I) -> Option<O>,
}

impl<I: ?Sized, O> Strategy<I, O> {
    pub const fn new(name: &'static str, run: fn(&I) -> Option<O>) -> Self {
        Self { name, run }
    }
}

/// Runs `strategies` in order. Each output is handed to `accept`, which decides
/// whether it counts as a success (and may transform it). Returns the first
/// accepted result, or `None` once the chain is exhausted.
pub fn first_success<I: ?Sized, O, R>(
    input: &I,
    strategies: &[Strategy<I, O>],
    mut accept: impl FnMut(&'static str, O) -> Option<R>,
) -> Option<R> {
    for strategy in strategies {
        let Some(output) = (strategy.run)(input) else {
            debug!(strategy = strategy.name, "strategy produced nothing");
            continue;
        };
        match accept(strategy.name, output) {
            Some(result) => {
                debug!(strategy = strategy.name, "strategy accepted");
                return Some(result);
            }
            None => debug!(strategy = strategy.name, "strategy output rejected"),
        }
    }
    None
}

/// Names of the strategies in a chain, for diagnostics.
pub fn strategy_names<I: ?Sized, O>(strategies: &[Strategy<I, O>]) -> Vec<&'static str> {
    strategies.iter().map(|s| s.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn never(_: &str) -> Option<String> {
        None
    }

    fn short(_: &str) -> Option<String> {
        Some("ab".to_string())
    }

    fn echo(input: &str) -> Option<String> {
        Some(input.to_string())
    }

    #[test]
    fn test_first_accepted_wins() {
        let chain = [
            Strategy::new("never", never),
            Strategy::new("short", short),
            Strategy::new("echo", echo),
        ];
        let result = first_success("hello world", &chain, |name, out: String| {
            (out.len() > 3).then(|| (name, out))
        });
        assert_eq!(result, Some(("echo", "hello world".to_string())));
    }

    #[test]
    fn test_exhausted_chain_returns_none() {
        let chain = [Strategy::new("never", never), Strategy::new("short", short)];
        let result = first_success("x", &chain, |_, out: String| (out.len() > 10).then_some(out));
        assert_eq!(result, None);
    }

    #[test]
    fn test_stops_at_first_success() {
        let chain = [Strategy::new("short", short), Strategy::new("echo", echo)];
        let mut seen = Vec::new();
        let result = first_success("input", &chain, |name, out: String| {
            seen.push(name);
            Some(out)
        });
        assert_eq!(result.as_deref(), Some("ab"));
        assert_eq!(seen, vec!["short"]);
    }

    #[test]
    fn test_strategy_names() {
        let chain = [Strategy::new("a", never), Strategy::new("b", echo)];
        assert_eq!(strategy_names(&chain), vec!["a", "b"]);
    }
}
