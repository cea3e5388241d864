#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use enginekit_docker::docker::DockerError;
use enginekit_docker::executor::DockerExecutor;
use mockall::mock;

mock! {
    pub Executor {}

    impl DockerExecutor for Executor {
        async fn exec(&self, args: &[String]) -> Result<String, DockerError>;
        async fn exec_streaming(&self, args: &[String]) -> Result<(), DockerError>;
    }
}

/// Every argument vector the mock saw, in call order.
pub type CallLog = Arc<Mutex<Vec<Vec<String>>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn failed(args: &[String], output: &str) -> DockerError {
    DockerError::CommandFailed {
        program: "docker".to_owned(),
        args: args.to_vec(),
        status: "exit status: 1".to_owned(),
        output: output.to_owned(),
    }
}

pub fn strings(a: &[&str]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
