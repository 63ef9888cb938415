#![forbid(unsafe_code)]

use netscript_graph::schema::FRESH_SIGIL;

/// Issues graph value names that no source identifier can spell.
#[derive(Clone, Debug, Default)]
pub struct NameGen {
    next: u32,
}

impl NameGen {
    pub fn fresh(&mut self) -> String {
        let name = format!("{FRESH_SIGIL}t{}", self.next);
        self.next += 1;
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netscript_graph::schema::is_fresh_name;

    #[test]
    fn names_are_monotonic_and_reserved() {
        let mut names = NameGen::default();
        let a = names.fresh();
        let b = names.fresh();
        assert_eq!(a, "$t0");
        assert_eq!(b, "$t1");
        assert!(is_fresh_name(&a));
        assert_eq!(names.fresh(), "$t2");
    }
}
