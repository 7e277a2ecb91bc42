use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A functions directory inside its own temp dir, so `../.firebaserc`
/// never resolves outside the test
pub struct TestProject {
    pub root: TempDir,
}

impl TestProject {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("functions")).unwrap();
        Self { root }
    }

    pub fn write_main_py(&self, content: &str) {
        fs::write(self.path().join("main.py"), content).unwrap();
    }

    #[allow(dead_code)]
    pub fn write_manifest(&self, content: &str) {
        fs::write(self.path().join("functions.kdl"), content).unwrap();
    }

    pub fn path(&self) -> PathBuf {
        self.root.path().join("functions")
    }
}

/// Stand-in `gcloud` and `firebase` scripts that log their arguments
#[cfg(unix)]
#[allow(dead_code)]
pub struct FakeCloud {
    dir: TempDir,
}

#[cfg(unix)]
#[allow(dead_code)]
impl FakeCloud {
    /// `functions_json` is printed by `gcloud functions list`;
    /// `gcloud functions delete` exits with `delete_status`
    pub fn new(functions_json: &str, delete_status: i32) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("calls.log");
        let functions = dir.path().join("functions.json");
        fs::write(&functions, functions_json).unwrap();

        let gcloud = format!(
            r#"#!/bin/sh
echo "gcloud $*" >> "{log}"
case "$1 $2" in
  "functions list") cat "{functions}" ;;
  "functions delete") exit {delete_status} ;;
  "auth list") echo "dev@example.com" ;;
esac
exit 0
"#,
            log = log.display(),
            functions = functions.display(),
        );
        let firebase = format!(
            "#!/bin/sh\necho \"firebase $*\" >> \"{}\"\nexit 0\n",
            log.display()
        );

        let fake = Self { dir };
        fake.write_script("gcloud", &gcloud);
        fake.write_script("firebase", &firebase);
        fake
    }

    fn write_script(&self, name: &str, content: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = self.dir.path().join(name);
        fs::write(&path, content).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// `PATH` with the fake tools first
    pub fn path_env(&self) -> std::ffi::OsString {
        let mut paths = vec![self.dir.path().to_path_buf()];
        if let Some(path) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&path));
        }
        std::env::join_paths(paths).unwrap()
    }

    /// Every command run so far, in order
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
