mod common;
mod evaluation;
mod scoring;
mod validation;
