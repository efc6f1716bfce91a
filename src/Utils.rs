//! different utility modules used throughout the project
/// logger setup and a tiny module to save renderings into a file
pub mod logger;
/// parse a rule document with structure like "\"selector\": payload" or "\"selector\":\n  key: value" into a RuleTable
pub mod task_parser;
