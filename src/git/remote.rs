use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::home_dir;
use git2::{Cred, CredentialType, Error, PushOptions, RemoteCallbacks, Repository};
use tracing::debug;

fn find_ssh_key() -> Result<PathBuf, Error> {
    let home = home_dir().ok_or_else(|| Error::from_str("Failed to find HOME directory"))?;
    for k in ["id_ed25519", "id_rsa"] {
        let ssh_key_path = home.join(".ssh").join(k);
        if ssh_key_path.exists() {
            return Ok(ssh_key_path);
        }
    }
    Err(Error::from_str("Failed to find ssh_key on your machine"))
}

/// Callbacks trying, in order: a key from `~/.ssh`, default credentials,
/// then the ssh agent.
pub fn auth_callbacks<'a>() -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();

    callbacks.credentials(|_url, username_from_url, allowed_types| {
        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY)
            && let Ok(ssh_key_path) = find_ssh_key()
            && let Ok(cred) = Cred::ssh_key(username, None, &ssh_key_path, None)
        {
            return Ok(cred);
        }

        if allowed_types.contains(CredentialType::DEFAULT)
            && let Ok(cred) = Cred::default()
        {
            return Ok(cred);
        }

        if allowed_types.contains(CredentialType::SSH_KEY)
            && let Ok(cred) = Cred::ssh_key_from_agent(username)
        {
            return Ok(cred);
        }

        Err(Error::from_str("No authentication methods available"))
    });

    callbacks
}

/// Pushes the local `branch` to the same branch on `remote_name`.
pub fn push_branch(repo: &Repository, remote_name: &str, branch: &str) -> Result<()> {
    let mut remote = repo
        .find_remote(remote_name)
        .with_context(|| format!("Remote `{remote_name}` not found"))?;
    let refspec = format!("refs/heads/{branch}:refs/heads/{branch}");

    let mut rejected: Option<String> = None;
    {
        let mut callbacks = auth_callbacks();
        callbacks.push_update_reference(|refname, status| {
            if let Some(msg) = status {
                rejected = Some(format!("{refname}: {msg}"));
            }
            Ok(())
        });

        let mut options = PushOptions::new();
        options.remote_callbacks(callbacks);
        remote
            .push(&[refspec.as_str()], Some(&mut options))
            .with_context(|| format!("Unable to git push {remote_name} {branch}"))?;
    }

    if let Some(reason) = rejected {
        anyhow::bail!("Push rejected by {remote_name}: {reason}");
    }
    debug!("pushed {refspec} to {remote_name}");
    Ok(())
}
