//! Spawning and reaping of child processes started by `spawn` commands and
//! scratchpads.
use std::process::{Child, Command, Stdio};

pub type ChildID = u32;

#[derive(Debug, Default)]
pub struct Children {
    inner: Vec<Child>,
}

impl Children {
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn insert(&mut self, child: Child) {
        self.inner.push(child);
    }

    /// Drop every child that has exited so it does not linger as a zombie.
    pub fn reap(&mut self) {
        self.inner
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

/// Run a command line through `sh -c`, detached from our stdio.
pub fn exec_shell(cmd: &str, children: &mut Children) -> Option<ChildID> {
    let child = Command::new("sh")
        .arg("-c")
        .arg(cmd)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|err| tracing::error!("failed to spawn '{cmd}': {err}"))
        .ok()?;
    let pid = child.id();
    children.insert(child);
    Some(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reap_removes_exited_children() {
        let mut children = Children::default();
        exec_shell("true", &mut children).expect("spawn");
        assert_eq!(children.len(), 1);
        // give the child a moment to exit
        std::thread::sleep(std::time::Duration::from_millis(200));
        children.reap();
        assert!(children.is_empty());
    }
}
