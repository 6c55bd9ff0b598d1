//! Installer backed by real subprocesses.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::environment::Environment;
use crate::error::Result;
use crate::platform::PlatformProfile;
use crate::shell;

/// Installer that drives the host's package manager and toolchains.
pub struct SystemInstaller {
    profile: PlatformProfile,
    env: Environment,
    command_env: HashMap<String, String>,
}

impl SystemInstaller {
    pub fn new(profile: PlatformProfile, env: Environment) -> Self {
        let command_env = profile.command_env();
        Self {
            profile,
            env,
            command_env,
        }
    }

    fn run(&self, command: &str) -> Result<()> {
        tracing::debug!(command, "running installer command");
        shell::execute_checked(command, &self.command_env)
    }

    /// Probe a tool's version; a failing probe means "not installed".
    fn probe(&self, command: &str) -> Result<String> {
        let result = shell::execute_quiet(command, None, &self.command_env)?;
        if result.success {
            Ok(result.stdout.trim().to_string())
        } else {
            Ok(String::new())
        }
    }

    /// Run a command with the nvm script sourced.
    fn nvm(&self, rest: &str) -> String {
        format!(
            "export NVM_DIR={dir} && . \"$NVM_DIR/nvm.sh\" && {rest}",
            dir = self.env.node_dir().display(),
        )
    }

    fn venv_bin(&self, tool: &str) -> PathBuf {
        self.env.venv_dir().join("bin").join(tool)
    }
}

impl super::Installer for SystemInstaller {
    fn refresh_package_index(&mut self) -> Result<()> {
        self.run(self.profile.refresh_command())
    }

    fn upgrade_system(&mut self) -> Result<()> {
        self.run(self.profile.upgrade_command())
    }

    fn install_packages(&mut self, packages: &[&str]) -> Result<()> {
        self.run(&self.profile.install_command(packages))
    }

    fn version_manager_version(&mut self) -> Result<String> {
        self.probe(&self.nvm("nvm --version"))
    }

    fn install_version_manager(&mut self, version: &str) -> Result<()> {
        let command = format!(
            "curl -fsSL https://raw.githubusercontent.com/nvm-sh/nvm/v{version}/install.sh \
             | NVM_DIR={dir} PROFILE=/dev/null bash",
            dir = self.env.node_dir().display(),
        );
        self.run(&command)
    }

    fn runtime_version(&mut self) -> Result<String> {
        self.probe(&self.nvm("node --version"))
    }

    fn install_runtime(&mut self, version: &str) -> Result<()> {
        self.run(&self.nvm(&format!("nvm install {version}")))
    }

    fn set_runtime_alias(&mut self, alias: &str, version: &str) -> Result<()> {
        self.run(&self.nvm(&format!("nvm alias {alias} {version}")))
    }

    fn create_virtualenv(&mut self, dir: &Path) -> Result<()> {
        self.run(&format!("python3 -m venv {}", dir.display()))
    }

    fn install_python_packages(&mut self, packages: &[&str]) -> Result<()> {
        self.run(&format!(
            "{pip} install --upgrade {list}",
            pip = self.venv_bin("pip").display(),
            list = packages.join(" "),
        ))
    }

    fn clone_and_install(&mut self, repo: &str) -> Result<()> {
        let name = repo.rsplit('/').next().unwrap_or("helper");
        let checkout = self.env.cache_dir().join("src").join(name);
        if !checkout.exists() {
            std::fs::create_dir_all(checkout.parent().unwrap_or(Path::new(".")))?;
            self.run(&format!("git clone --depth 1 {repo} {}", checkout.display()))?;
        }
        self.run(&format!(
            "{pip} install -e {}",
            checkout.display(),
            pip = self.venv_bin("pip").display(),
        ))
    }

    fn install_node_package(&mut self, package: &str) -> Result<()> {
        self.run(&self.nvm(&format!(
            "nvm exec {alias} npm install -g --unsafe-perm {package}",
            alias = crate::toolchain::RUNTIME_ALIAS,
        )))
    }

    fn copy_template(&mut self, source: &Path, dest: &Path) -> Result<()> {
        copy_dir(source, dest)
    }

    fn apply_wifi_firmware_fix(&mut self) -> Result<()> {
        // The stock brcmfmac blob drops AP mode under load on the Pi.
        let command = format!(
            "sudo cp {src} /lib/firmware/brcm/brcmfmac43430-sdio.bin",
            src = self
                .env
                .data_dir()
                .join("firmware")
                .join("brcmfmac43430-sdio.bin")
                .display(),
        );
        self.run(&command)
    }

    fn predownload_platform(&mut self, platform: &str) -> Result<()> {
        self.run(&format!(
            "{pio} pkg install --global --platform {platform}",
            pio = self.venv_bin("pio").display(),
        ))
    }

    fn fill_build_cache(&mut self) -> Result<()> {
        self.run(&format!(
            "{pio} run -d {template}",
            pio = self.venv_bin("pio").display(),
            template = self.env.template_source().display(),
        ))
    }

    fn build_docs(&mut self) -> Result<()> {
        self.run(&format!(
            "make -C {docs}",
            docs = self.env.data_dir().join("docs").display(),
        ))
    }

    fn grant_serial_access(&mut self) -> Result<()> {
        self.run("sudo usermod -a -G dialout $USER")
    }

    fn run_verification(&mut self) -> Result<()> {
        self.run(&format!(
            "{python} -m pytest {suite} -q",
            python = self.venv_bin("python").display(),
            suite = self.env.data_dir().join("selftest").display(),
        ))
    }
}

/// Recursively copy a directory.
fn copy_dir(source: &Path, dest: &Path) -> Result<()> {
    std::fs::create_dir_all(dest)?;
    for entry in std::fs::read_dir(source)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
