//! Step execution engine.
//!
//! Runs the installation steps in a fixed total order, skipping steps whose
//! option is off and steps whose target artifact already exists. Execution
//! is synchronous and fail-fast: the first failing external action aborts
//! the run. Idempotency markers are a directory (core env), a sentinel line
//! (config patches), or a lock file under the data directory.

use std::path::Path;

use crate::environment::Environment;
use crate::error::{Result, RoostError};
use crate::install::Installer;
use crate::options::InstallOptions;
use crate::platform::PlatformProfile;
use crate::state;
use crate::toolchain;
use crate::ui;

use super::patch;

/// Core library manifest installed into the isolated runtime.
const CORE_PACKAGES: &[&str] = &[
    "pyserial",
    "paho-mqtt",
    "websockets",
    "esptool",
    "platformio",
];

/// Helper projects cloned and installed editable into the runtime.
const HELPER_REPOS: &[&str] = &[
    "https://github.com/dhylands/rshell",
    "https://github.com/wendlers/mpfshell",
];

/// Build platforms fetched by the pre-download step.
const BUILD_PLATFORMS: &[&str] = &["espressif32", "espressif8266"];

/// Terminal state of an executed step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// The step performed its action.
    Completed,
    /// The target artifact already existed; nothing was done.
    Skipped,
}

/// Record of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub name: &'static str,
    pub status: StepStatus,
}

/// Runs the fixed step sequence against an [`Installer`].
pub struct Executor<'a> {
    env: &'a Environment,
    profile: PlatformProfile,
    options: &'a InstallOptions,
}

impl<'a> Executor<'a> {
    pub fn new(
        env: &'a Environment,
        profile: PlatformProfile,
        options: &'a InstallOptions,
    ) -> Self {
        Self {
            env,
            profile,
            options,
        }
    }

    /// Execute every enabled step in order, returning their outcomes.
    pub fn run(&self, installer: &mut dyn Installer) -> Result<Vec<StepOutcome>> {
        let mut outcomes = Vec::new();

        if self.options.needs_index_refresh() {
            self.step("refresh-package-index", &mut outcomes, |_, ins| {
                ins.refresh_package_index()?;
                Ok(StepStatus::Completed)
            }, installer)?;
        }

        if self.options.upgrade {
            self.step("system-upgrade", &mut outcomes, |_, ins| {
                ins.upgrade_system()?;
                Ok(StepStatus::Completed)
            }, installer)?;
        }

        if self.options.system_deps {
            self.step("system-deps", &mut outcomes, |ex, ins| {
                ex.lock_guarded("system-deps", ins, |ex, ins| {
                    ins.install_packages(ex.profile.system_packages())?;
                    toolchain::ensure_toolchain(ins)
                })
            }, installer)?;
        }

        if self.options.core {
            self.step("core-env", &mut outcomes, Self::core_env, installer)?;
        }

        if self.options.cloudcmd {
            self.step("cloudcmd", &mut outcomes, Self::cloudcmd, installer)?;
        }

        if self.options.nodered {
            self.step("node-red", &mut outcomes, Self::nodered, installer)?;
        }

        if self.options.nginx {
            self.step("nginx", &mut outcomes, Self::nginx, installer)?;
        }

        if self.options.mosquitto {
            self.step("mosquitto", &mut outcomes, Self::mosquitto, installer)?;
        }

        if self.options.tools {
            self.step("tools", &mut outcomes, |ex, ins| {
                ex.lock_guarded("tools", ins, |ex, ins| {
                    ins.install_packages(ex.profile.tool_packages())
                })
            }, installer)?;
        }

        if self.options.template {
            self.step("template", &mut outcomes, Self::template, installer)?;
        }

        if self.options.wifi && self.profile.is_single_board() {
            self.step("wifi-firmware", &mut outcomes, |ex, ins| {
                ex.lock_guarded("wifi-firmware", ins, |_, ins| {
                    ins.apply_wifi_firmware_fix()
                })
            }, installer)?;
        }

        // Unconditional: repairs executable bits under the local bin dir.
        self.step("repair-bin-permissions", &mut outcomes, |ex, _| {
            ex.repair_bin_permissions()
        }, installer)?;

        if self.options.platforms {
            self.step("predownload-platforms", &mut outcomes, Self::predownload, installer)?;
        }

        if self.options.cache {
            self.step("build-cache", &mut outcomes, Self::build_cache, installer)?;
        }

        self.step("build-docs", &mut outcomes, |_, ins| {
            ins.build_docs()?;
            Ok(StepStatus::Completed)
        }, installer)?;

        if self.options.serial {
            self.step("serial-access", &mut outcomes, |ex, ins| {
                ex.lock_guarded("serial", ins, |_, ins| ins.grant_serial_access())
            }, installer)?;
        }

        self.step("persist-state", &mut outcomes, |ex, _| {
            state::persist(ex.options, &ex.env.options_file())?;
            Ok(StepStatus::Completed)
        }, installer)?;

        // Verification failure propagates as the run's own failure.
        self.step("verification", &mut outcomes, |_, ins| {
            ins.run_verification()?;
            Ok(StepStatus::Completed)
        }, installer)?;

        Ok(outcomes)
    }

    fn step(
        &self,
        name: &'static str,
        outcomes: &mut Vec<StepOutcome>,
        body: impl FnOnce(&Self, &mut dyn Installer) -> Result<StepStatus>,
        installer: &mut dyn Installer,
    ) -> Result<()> {
        tracing::info!(step = name, "running step");
        let status = body(self, installer).map_err(|e| RoostError::StepFailed {
            step: name.to_string(),
            message: e.to_string(),
        })?;
        match status {
            StepStatus::Completed => ui::success(name),
            StepStatus::Skipped => ui::skipped(&format!("{} (already complete)", name)),
        }
        outcomes.push(StepOutcome { name, status });
        Ok(())
    }

    /// Run `body` unless the named lock file exists; write it on success.
    fn lock_guarded(
        &self,
        lock_name: &str,
        installer: &mut dyn Installer,
        body: impl FnOnce(&Self, &mut dyn Installer) -> Result<()>,
    ) -> Result<StepStatus> {
        let lock = self.env.lock_file(lock_name);
        if lock.exists() {
            return Ok(StepStatus::Skipped);
        }
        body(self, installer)?;
        write_lock(&lock)?;
        Ok(StepStatus::Completed)
    }

    /// Provision the node workspace once; re-entered by every node-backed
    /// component.
    fn ensure_node_workspace(&self, installer: &mut dyn Installer) -> Result<()> {
        if self.env.node_dir().exists() {
            return Ok(());
        }
        toolchain::ensure_toolchain(installer)?;
        std::fs::create_dir_all(self.env.node_dir())?;
        Ok(())
    }

    fn core_env(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        if self.env.venv_dir().exists() {
            return Ok(StepStatus::Skipped);
        }
        installer.create_virtualenv(&self.env.venv_dir())?;
        installer.install_python_packages(CORE_PACKAGES)?;
        for repo in HELPER_REPOS {
            installer.clone_and_install(repo)?;
        }
        self.ensure_node_workspace(installer)?;
        Ok(StepStatus::Completed)
    }

    fn cloudcmd(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        self.lock_guarded("cloudcmd", installer, |ex, ins| {
            ex.ensure_node_workspace(ins)?;
            ins.install_node_package("cloudcmd")?;
            patch::append_once(
                &ex.env.services_config(),
                "# roost service: cloudcmd",
                "cloudcmd --port 8000 --root ~ --one-file-panel\n",
            )?;
            Ok(())
        })
    }

    fn nodered(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        self.lock_guarded("node-red", installer, |ex, ins| {
            ex.ensure_node_workspace(ins)?;
            ins.install_node_package("node-red")?;
            patch::append_once(
                &ex.env.services_config(),
                "# roost service: node-red",
                "node-red --port 1880\n",
            )?;
            Ok(())
        })
    }

    fn nginx(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        self.lock_guarded("nginx", installer, |ex, ins| {
            ins.install_packages(&[ex.profile.web_server_package()])?;
            patch::append_once(
                &ex.env.nginx_config(),
                "# roost managed",
                concat!(
                    "server {\n",
                    "    listen 80 default_server;\n",
                    "    location /files/ { proxy_pass http://127.0.0.1:8000/; }\n",
                    "    location /flows/ { proxy_pass http://127.0.0.1:1880/; }\n",
                    "}\n",
                ),
            )?;
            Ok(())
        })
    }

    fn mosquitto(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        self.lock_guarded("mosquitto", installer, |ex, ins| {
            ins.install_packages(&[ex.profile.mqtt_broker_package()])?;
            patch::append_once(
                &ex.env.services_config(),
                "# roost service: mosquitto",
                "listener 1883\nallow_anonymous true\n",
            )?;
            Ok(())
        })
    }

    fn template(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        let dest = self.env.template_dest();
        if dest.exists() {
            tracing::info!(dest = %dest.display(), "already exists, skipping");
            return Ok(StepStatus::Skipped);
        }
        installer.copy_template(&self.env.template_source(), &dest)?;
        Ok(StepStatus::Completed)
    }

    fn repair_bin_permissions(&self) -> Result<StepStatus> {
        let dir = self.env.bin_dir();
        std::fs::create_dir_all(&dir)?;
        let entries = std::fs::read_dir(&dir).map_err(|_| {
            RoostError::DirectoryUnreadable { path: dir.clone() }
        })?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(
                    entry.path(),
                    std::fs::Permissions::from_mode(0o755),
                )?;
            }
        }
        Ok(StepStatus::Completed)
    }

    fn predownload(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        let mut fetched = false;
        for platform in BUILD_PLATFORMS {
            let lock = self.env.lock_file(&format!("platform-{}", platform));
            if lock.exists() {
                continue;
            }
            installer.predownload_platform(platform)?;
            write_lock(&lock)?;
            fetched = true;
        }
        Ok(if fetched {
            StepStatus::Completed
        } else {
            StepStatus::Skipped
        })
    }

    fn build_cache(&self, installer: &mut dyn Installer) -> Result<StepStatus> {
        let lock = self.env.lock_file("build-cache");
        if lock.exists() {
            return Ok(StepStatus::Skipped);
        }
        let spinner = ui::long_step_spinner("filling build cache (this can take a while)");
        let result = installer.fill_build_cache();
        spinner.finish_and_clear();
        result?;
        write_lock(&lock)?;
        Ok(StepStatus::Completed)
    }
}

fn write_lock(lock: &Path) -> Result<()> {
    if let Some(parent) = lock.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(lock, "")?;
    Ok(())
}
