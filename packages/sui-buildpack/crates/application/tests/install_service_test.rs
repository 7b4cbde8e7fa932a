mod common;

use std::fs;
use std::path::Path;

use application::Provisioner;
use common::{deploy_config, RecordingRunner};
use domain::entities::{EnvBehavior, ToolchainLayout, ENV_MOVE_HOME, ENV_PATH, ENV_SUI_CONFIG_DIR};
use domain::error::{ErrorKind, ErrorKindExt};
use domain::system::Architecture;
use flate2::write::GzEncoder;
use flate2::Compression;
use pretty_assertions::assert_eq;

fn release_archive(dir: &Path, entries: &[(&str, &[u8])]) -> std::path::PathBuf {
    let path = dir.join("sui-devnet-v1.14.0-ubuntu-x86_64.tgz");
    let file = fs::File::create(&path).unwrap();
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));

    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, *data).unwrap();
    }

    builder.into_inner().unwrap().finish().unwrap();
    path
}

#[test]
fn test_install_platform_binary() {
    let downloads = tempfile::tempdir().unwrap();
    let layer = tempfile::tempdir().unwrap();
    let archive = release_archive(
        downloads.path(),
        &[
            ("release/target/release/sui-ubuntu-x86_64", b"platform"),
            ("release/target/release/sui-node", b"node"),
        ],
    );

    let runner = RecordingRunner::new();
    let config = deploy_config(false, "devnet");
    let layout = ToolchainLayout::new(layer.path());

    Provisioner::new(&runner, &config)
        .install(&archive, &layout, Architecture::X86_64)
        .unwrap();

    assert_eq!(fs::read(layout.binary()).unwrap(), b"platform");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(layout.binary()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
    assert!(runner.calls().is_empty());
}

#[test]
fn test_install_plain_binary() {
    let downloads = tempfile::tempdir().unwrap();
    let layer = tempfile::tempdir().unwrap();
    let archive = release_archive(downloads.path(), &[("sui-v1.20.0/sui", b"plain")]);

    let runner = RecordingRunner::new();
    let config = deploy_config(false, "devnet");
    let layout = ToolchainLayout::new(layer.path());

    Provisioner::new(&runner, &config)
        .install(&archive, &layout, Architecture::Aarch64)
        .unwrap();

    assert_eq!(fs::read(layout.binary()).unwrap(), b"plain");
}

#[test]
fn test_install_without_binary() {
    let downloads = tempfile::tempdir().unwrap();
    let layer = tempfile::tempdir().unwrap();
    let archive = release_archive(downloads.path(), &[("release/README.md", b"docs")]);

    let runner = RecordingRunner::new();
    let config = deploy_config(false, "devnet");
    let layout = ToolchainLayout::new(layer.path());

    let err = Provisioner::new(&runner, &config)
        .install(&archive, &layout, Architecture::X86_64)
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::NotFound));
    assert!(!layout.binary().exists());
}

#[test]
fn test_contribute_without_deploy() {
    let layer = tempfile::tempdir().unwrap();
    let app = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::sui("ed25519").reply("sui move build", 0, "BUILDING counter\n");
    let config = deploy_config(false, "devnet");
    let layout = ToolchainLayout::new(layer.path());

    let contribution = Provisioner::new(&runner, &config)
        .contribute(&layout, app.path(), Some("/usr/bin".into()))
        .unwrap();

    assert_eq!(contribution.version.to_string(), "1.14.0-c2a1e4f");
    assert_eq!(contribution.wallet, None);
    assert!(layout.move_home().is_dir());
    assert!(layout.sui_config_dir().is_dir());

    assert_eq!(runner.commands(), vec!["sui --version", "sui move build"]);

    let calls = runner.calls();
    let build = &calls[1];
    assert_eq!(build.working_dir.as_deref(), Some(app.path()));
    assert_eq!(
        build.env.get(ENV_MOVE_HOME),
        Some(&layout.move_home().into_os_string())
    );
    assert_eq!(
        build.env.get(ENV_SUI_CONFIG_DIR),
        Some(&layout.sui_config_dir().into_os_string())
    );
    let path = build.env.get(ENV_PATH).unwrap().to_string_lossy().into_owned();
    assert!(path.starts_with(&layout.bin_dir().display().to_string()));
    assert!(path.ends_with("/usr/bin"));

    let launch = &contribution.launch.modifications;
    assert!(launch.iter().any(|m| m.name == ENV_PATH
        && m.value == layout.bin_dir()
        && matches!(m.behavior, EnvBehavior::Append { .. })));
    assert!(launch
        .iter()
        .any(|m| m.name == ENV_MOVE_HOME && m.behavior == EnvBehavior::Default));
}

#[test]
fn test_contribute_with_deploy() {
    let layer = tempfile::tempdir().unwrap();
    let app = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::sui("ed25519");
    let config = deploy_config(true, "devnet");
    let layout = ToolchainLayout::new(layer.path());

    let provisioner = Provisioner::new(&runner, &config);
    let contribution = provisioner.contribute(&layout, app.path(), None).unwrap();

    assert_eq!(contribution.wallet.unwrap().address, "0xabc");
    let commands = runner.commands();
    assert_eq!(commands[0], "sui --version");
    assert_eq!(commands[1], "sui move build");
    assert_eq!(commands[2], "sui client --yes envs");
    assert_eq!(commands.len(), 6);

    let processes = provisioner.process_types().unwrap();
    assert_eq!(processes.len(), 1);
    assert!(processes[0].default);
    assert_eq!(processes[0].args[0], "client");
}

#[test]
fn test_compile_failure_stops_the_build() {
    let layer = tempfile::tempdir().unwrap();
    let app = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::sui("ed25519").reply(
        "sui move build",
        1,
        "error[E03002]: unbound module",
    );
    let config = deploy_config(true, "devnet");
    let layout = ToolchainLayout::new(layer.path());

    let err = Provisioner::new(&runner, &config)
        .contribute(&layout, app.path(), None)
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::ExternalTool));
    assert_eq!(err.to_string(), "unable to compile contract");
    let message = format!("{:#}", err);
    assert!(message.starts_with("unable to compile contract"));
    assert!(message.contains("unbound module"));
    assert_eq!(runner.commands().len(), 2);
}

#[test]
fn test_unreadable_version() {
    let layer = tempfile::tempdir().unwrap();
    let app = tempfile::tempdir().unwrap();
    let runner = RecordingRunner::new().reply("sui --version", 0, "garbage");
    let config = deploy_config(false, "devnet");
    let layout = ToolchainLayout::new(layer.path());

    let err = Provisioner::new(&runner, &config)
        .contribute(&layout, app.path(), None)
        .unwrap_err();

    assert_eq!(err.kind(), Some(ErrorKind::Parse));
    assert_eq!(runner.commands(), vec!["sui --version"]);
}
