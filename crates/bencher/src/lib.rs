//! Fixtures shared by the negotiation benchmarks.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    group: TestGroup,
    header: TestHeader,
    candidates: &'static [&'static str],
}

impl TestCase {
    pub fn new(name: &'static str, group: TestGroup, header: TestHeader, candidates: &'static [&'static str]) -> Self {
        Self { name, group, header, candidates }
    }

    /// A header matched against a handful of candidates.
    pub fn few(name: &'static str, header: TestHeader, candidates: &'static [&'static str]) -> Self {
        Self::new(name, TestGroup::FewCandidates, header, candidates)
    }

    /// A header matched against a registry sized candidate list.
    pub fn many(name: &'static str, header: TestHeader, candidates: &'static [&'static str]) -> Self {
        Self::new(name, TestGroup::ManyCandidates, header, candidates)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn group(&self) -> TestGroup {
        self.group
    }

    pub fn header(&self) -> &TestHeader {
        &self.header
    }

    pub fn candidates(&self) -> Vec<String> {
        self.candidates.iter().map(ToString::to_string).collect()
    }
}

/// A recorded header value, loaded from `resources/`.
#[derive(Debug, Copy, Clone)]
pub struct TestHeader {
    file_name: &'static str,
    value: &'static str,
}

impl TestHeader {
    pub const fn new(file_name: &'static str, value: &'static str) -> Self {
        Self { file_name, value }
    }

    pub fn value(&self) -> &'static str {
        self.value.trim()
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    FewCandidates,
    ManyCandidates,
}
