// Integration test utilities and project fixtures for emberscope.

use std::path::Path;

use emberscope_core::config::ExplorerConfig;
use emberscope_core::explorer::Explorer;
use emberscope_core::progress::NoopReporter;

/// A throwaway project tree on disk.
#[derive(Debug)]
pub struct TestProject {
    pub dir: tempfile::TempDir,
}

impl TestProject {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `relative`, creating parent directories.
    pub fn write(&self, relative: &str, content: &str) -> &Self {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(path, content).expect("write fixture file");
        self
    }

    /// Absolute, forward-slash form of `relative` as discovery reports it.
    pub fn file(&self, relative: &str) -> String {
        emberscope_syntax::resolve::serialize_path(&self.path().join(relative))
    }

    /// An application with an addon tree, a classic component split over a
    /// script and a template, a pod component, a route and one template that
    /// does not parse.
    pub fn ember_app() -> Self {
        let project = Self::empty();
        project
            .write(
                "app/components/user-card.js",
                "import Component from '@ember/component';\n\
                 import { computed } from '@ember/object';\n\
                 import layout from '../templates/components/user-card';\n\
                 \n\
                 export default Component.extend({\n\
                 \x20 layout,\n\
                 \x20 tagName: 'article',\n\
                 \x20 classNames: ['user-card'],\n\
                 \x20 user: null,\n\
                 \x20 fullName: computed('user.firstName', 'user.lastName', function() {\n\
                 \x20   return `${this.user.firstName} ${this.user.lastName}`;\n\
                 \x20 }),\n\
                 \x20 actions: {\n\
                 \x20   select(user) {}\n\
                 \x20 }\n\
                 });\n",
            )
            .write(
                "app/templates/components/user-card.hbs",
                "<h2>{{this.user.firstName}}</h2>\n\
                 {{#if @showAvatar}}\n\
                 \x20 <AvatarImage @src={{this.user.avatar}} />\n\
                 {{/if}}\n\
                 <p>{{t \"user.select\"}}</p>\n",
            )
            .write(
                "addon/components/x-button.js",
                "import Component from '@ember/component';\n\
                 import layout from '../templates/components/x-button';\n\
                 \n\
                 export default Component.extend({\n\
                 \x20 layout,\n\
                 \x20 tagName: 'button',\n\
                 \x20 attributeBindings: ['disabled'],\n\
                 \x20 disabled: false,\n\
                 });\n",
            )
            .write(
                "addon/templates/components/x-button.hbs",
                "<span>{{model.title}}</span>{{yield}}\n",
            )
            .write(
                "app/components/x-button.js",
                "export { default } from 'my-addon/components/x-button';\n",
            )
            .write(
                "app/pods/avatar-image/component.js",
                "import Component from '@ember/component';\n\
                 export default Component.extend({ tagName: 'img' });\n",
            )
            .write("app/components/broken.hbs", "{{#if ready}}\n  <p>never closed</p>\n")
            .write("app/routes/index.js", "export default Route.extend({});\n")
            .write("app/styles/app.css", ".user-card {}\n")
            .write("node_modules/left-pad/index.js", "module.exports = {};\n");
        project
    }

    /// Scan the project with its on-disk configuration.
    pub async fn scan(&self) -> Explorer {
        let config = ExplorerConfig::load(self.path()).expect("load config");
        self.scan_with(config).await
    }

    pub async fn scan_with(&self, config: ExplorerConfig) -> Explorer {
        Explorer::scan(self.path(), config, &NoopReporter)
            .await
            .expect("scan project")
    }
}
