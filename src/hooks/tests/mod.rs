//! Hook bus test suites
