//! Route table and path resolution.

use std::collections::BTreeMap;

use thiserror::Error;

/// Redirects followed before giving up.
const MAX_REDIRECTS: usize = 8;

/// Pages the application can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Registration,
    /// Layout of the personal area; its children render inside it.
    Personal,
    Home,
    Library,
    Training,
    Help,
    Forbidden,
    Edit,
}

/// One entry of the route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    /// Absolute path pattern; `:name` segments capture a parameter.
    pub path: &'static str,
    pub page: Page,
    pub name: Option<&'static str>,
    /// Target visited instead when this exact path is requested.
    pub redirect: Option<&'static str>,
    /// Routes rendered inside this one. Their paths are absolute.
    pub children: Vec<Route>,
}

impl Route {
    pub fn new(path: &'static str, page: Page) -> Self {
        Self {
            path,
            page,
            name: None,
            redirect: None,
            children: Vec::new(),
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    pub fn redirect(mut self, target: &'static str) -> Self {
        self.redirect = Some(target);
        self
    }

    pub fn children(mut self, children: Vec<Route>) -> Self {
        self.children = children;
        self
    }
}

/// The application's route table.
pub fn routes() -> Vec<Route> {
    vec![
        Route::new("/login", Page::Login).named("LoginPage"),
        Route::new("/registration", Page::Registration),
        Route::new("/personal", Page::Personal)
            .named("PersonalPage")
            .redirect("/personal/home")
            .children(vec![
                Route::new("/personal/home", Page::Home),
                Route::new("/personal/library", Page::Library),
                Route::new("/personal/training", Page::Training),
                Route::new("/personal/help", Page::Help),
            ]),
        Route::new("/403", Page::Forbidden).named("403"),
        Route::new("/edit/:uuid", Page::Edit),
    ]
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches {0:?}")]
    NotFound(String),

    #[error("no route named {0:?}")]
    UnknownName(String),

    #[error("route {route:?} needs parameter {param:?}")]
    MissingParam { route: String, param: String },

    #[error("too many redirects resolving {0:?}")]
    RedirectLoop(String),
}

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    /// Final path after redirects.
    pub path: String,
    /// Pages to render, outermost layout first.
    pub pages: Vec<Page>,
    /// Captured `:name` segments.
    pub params: BTreeMap<String, String>,
    /// Name of the innermost matched route, if it has one.
    pub name: Option<&'static str>,
}

impl RouteMatch {
    /// The innermost page (the one the URL is "about"); `None` only for a
    /// hand-built match with no pages.
    pub fn page(&self) -> Option<Page> {
        self.pages.last().copied()
    }
}

/// Static router over a route table.
#[derive(Debug, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new(routes())
    }
}

impl Router {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve `path` to the pages it renders, following redirects.
    ///
    /// Query strings, fragments and trailing slashes are ignored.
    pub fn resolve(&self, path: &str) -> Result<RouteMatch, RouteError> {
        let mut current = normalize(path);

        for _ in 0..=MAX_REDIRECTS {
            let Some((chain, params)) = find(&self.routes, &current) else {
                return Err(RouteError::NotFound(current));
            };

            let leaf = chain[chain.len() - 1];
            if let Some(target) = leaf.redirect {
                tracing::debug!(from = %current, to = target, "following redirect");
                current = normalize(target);
                continue;
            }

            return Ok(RouteMatch {
                path: current,
                pages: chain.iter().map(|r| r.page).collect(),
                params,
                name: leaf.name,
            });
        }

        Err(RouteError::RedirectLoop(normalize(path)))
    }

    /// Build the path of the route called `name`, filling `:param` segments.
    pub fn href(&self, name: &str, params: &[(&str, &str)]) -> Result<String, RouteError> {
        let route = find_named(&self.routes, name)
            .ok_or_else(|| RouteError::UnknownName(name.to_string()))?;

        let mut out = String::new();
        for segment in segments(route.path) {
            out.push('/');
            match segment.strip_prefix(':') {
                Some(param) => {
                    let value = params
                        .iter()
                        .find(|(k, _)| *k == param)
                        .map(|(_, v)| *v)
                        .filter(|v| !v.is_empty())
                        .ok_or_else(|| RouteError::MissingParam {
                            route: name.to_string(),
                            param: param.to_string(),
                        })?;
                    out.push_str(value);
                }
                None => out.push_str(segment),
            }
        }

        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

fn normalize(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let joined = segments(path).collect::<Vec<_>>().join("/");
    format!("/{joined}")
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let mut pattern_segments = segments(pattern);
    let mut path_segments = segments(path);
    let mut params = BTreeMap::new();

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => match expected.strip_prefix(':') {
                Some(name) => {
                    params.insert(name.to_string(), actual.to_string());
                }
                None if expected == actual => {}
                None => return None,
            },
            _ => return None,
        }
    }
}

/// Depth-first search; returns the chain of routes from the outermost layout
/// down to the matched route.
fn find<'r>(routes: &'r [Route], path: &str) -> Option<(Vec<&'r Route>, BTreeMap<String, String>)> {
    for route in routes {
        if let Some(params) = match_pattern(route.path, path) {
            return Some((vec![route], params));
        }
        if let Some((mut chain, params)) = find(&route.children, path) {
            chain.insert(0, route);
            return Some((chain, params));
        }
    }
    None
}

fn find_named<'r>(routes: &'r [Route], name: &str) -> Option<&'r Route> {
    routes.iter().find_map(|route| {
        if route.name == Some(name) {
            Some(route)
        } else {
            find_named(&route.children, name)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personal_redirects_to_home_inside_layout() {
        let m = Router::default().resolve("/personal").unwrap();
        assert_eq!(m.path, "/personal/home");
        assert_eq!(m.pages, vec![Page::Personal, Page::Home]);
        assert_eq!(m.page(), Some(Page::Home));
    }

    #[test]
    fn empty_match_has_no_page() {
        let m = RouteMatch {
            path: "/".into(),
            pages: Vec::new(),
            params: BTreeMap::new(),
            name: None,
        };
        assert_eq!(m.page(), None);
    }

    #[test]
    fn personal_children_render_inside_layout() {
        let router = Router::default();
        for (path, page) in [
            ("/personal/home", Page::Home),
            ("/personal/library", Page::Library),
            ("/personal/training", Page::Training),
            ("/personal/help", Page::Help),
        ] {
            let m = router.resolve(path).unwrap();
            assert_eq!(m.pages, vec![Page::Personal, page], "{path}");
            assert_eq!(m.path, path);
        }
    }

    #[test]
    fn top_level_pages_resolve_with_names() {
        let router = Router::default();
        let login = router.resolve("/login").unwrap();
        assert_eq!(login.pages, vec![Page::Login]);
        assert_eq!(login.name, Some("LoginPage"));

        assert_eq!(router.resolve("/registration").unwrap().page(), Some(Page::Registration));
        assert_eq!(router.resolve("/403").unwrap().name, Some("403"));
    }

    #[test]
    fn edit_captures_identifier() {
        let m = Router::default()
            .resolve("/edit/0191b3c4-5d6e-7f80-9a1b-2c3d4e5f6071?tab=steps#top")
            .unwrap();
        assert_eq!(m.page(), Some(Page::Edit));
        assert_eq!(
            m.params.get("uuid").map(String::as_str),
            Some("0191b3c4-5d6e-7f80-9a1b-2c3d4e5f6071")
        );
    }

    #[test]
    fn trailing_slashes_are_ignored() {
        let m = Router::default().resolve("/personal/library/").unwrap();
        assert_eq!(m.page(), Some(Page::Library));
        assert_eq!(Router::default().resolve("personal/").unwrap().page(), Some(Page::Home));
    }

    #[test]
    fn unknown_paths_are_not_found() {
        let router = Router::default();
        assert_eq!(
            router.resolve("/personal/settings"),
            Err(RouteError::NotFound("/personal/settings".into()))
        );
        assert!(matches!(router.resolve("/"), Err(RouteError::NotFound(_))));
        assert!(matches!(router.resolve("/edit"), Err(RouteError::NotFound(_))));
        assert!(matches!(router.resolve("/edit/a/b"), Err(RouteError::NotFound(_))));
    }

    #[test]
    fn redirect_cycles_are_detected() {
        let router = Router::new(vec![
            Route::new("/a", Page::Home).redirect("/b"),
            Route::new("/b", Page::Help).redirect("/a"),
        ]);
        assert_eq!(router.resolve("/a"), Err(RouteError::RedirectLoop("/a".into())));
    }

    #[test]
    fn href_builds_named_paths() {
        let router = Router::new(vec![
            Route::new("/403", Page::Forbidden).named("403"),
            Route::new("/edit/:uuid", Page::Edit).named("EditPage"),
        ]);

        assert_eq!(router.href("403", &[]).unwrap(), "/403");
        assert_eq!(router.href("EditPage", &[("uuid", "t1")]).unwrap(), "/edit/t1");
        assert_eq!(
            router.href("EditPage", &[]),
            Err(RouteError::MissingParam {
                route: "EditPage".into(),
                param: "uuid".into()
            })
        );
        assert!(matches!(router.href("Nope", &[]), Err(RouteError::UnknownName(_))));
    }

    #[test]
    fn href_finds_nested_names() {
        let router = Router::new(vec![
            Route::new("/personal", Page::Personal)
                .children(vec![Route::new("/personal/help", Page::Help).named("HelpPage")]),
        ]);
        assert_eq!(router.href("HelpPage", &[]).unwrap(), "/personal/help");
    }
}
