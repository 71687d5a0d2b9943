//! The per-host view catalog.
//!
//! Asterisk hosts share one realtime database. Each host reads its SIP
//! configuration through a set of views that narrow the shared tables
//! (`ps_endpoints`, `ps_aors`, `ps_registrations`, `ps_contacts`) down to
//! the rows that belong to it, keyed by hostname via the `iaxfriends` peer
//! table. This module declares those views as data: one ordered list of
//! (name, defining query, scope) entries.
//!
//! Two views have fixed names shared by every host (the `internal` context
//! pair); the rest derive their name from the hostname digest so that each
//! host owns a distinct database object. Views over the `external` context
//! only exist on upstream hosts.

use crate::host::HostIdentity;
use crate::sql::quote_literal;

/// Column probed to test that a view resolves. Present in every catalog
/// view, since each one selects all columns of a table carrying `id`.
pub const PROBE_COLUMN: &str = "id";

/// Which hosts a view is provisioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewScope {
    /// Every host.
    AllHosts,
    /// Only hosts whose name marks them as upstream.
    Upstream,
}

impl ViewScope {
    /// True when a view with this scope belongs on `host`.
    #[must_use]
    pub fn includes(&self, host: &HostIdentity) -> bool {
        match self {
            ViewScope::AllHosts => true,
            ViewScope::Upstream => host.is_upstream(),
        }
    }
}

/// One view the daemon keeps present in the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDef {
    /// View name, already host-specific where applicable.
    pub name: String,
    /// The defining SELECT, with the hostname embedded as an escaped literal.
    pub query: String,
    /// Which hosts the view belongs on.
    pub scope: ViewScope,
}

impl ViewDef {
    fn new(name: impl Into<String>, query: impl Into<String>, scope: ViewScope) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            scope,
        }
    }

    /// True when this view belongs on `host`.
    #[must_use]
    pub fn applies_to(&self, host: &HostIdentity) -> bool {
        self.scope.includes(host)
    }

    /// The full DDL statement creating the view.
    ///
    /// The view name cannot be bound as a statement parameter; it is safe to
    /// interpolate because derived names are `prefix + hex digest` and fixed
    /// names are literals in this module.
    #[must_use]
    pub fn create_sql(&self) -> String {
        format!("CREATE VIEW {} AS {}", self.name, self.query)
    }

    /// A minimal query that succeeds iff the view resolves.
    ///
    /// Row count is irrelevant; only success or failure of the statement is
    /// observed.
    #[must_use]
    pub fn probe_sql(&self) -> String {
        format!("SELECT {} FROM {} LIMIT 1", PROBE_COLUMN, self.name)
    }
}

/// Builds the ordered list of views for `host`.
///
/// The list is recomputed on every reconciliation pass; entries are pure
/// functions of the hostname, so two calls for the same host are identical.
/// Order is fixed and creation of each view is independent of the others.
#[must_use]
pub fn view_defs(host: &HostIdentity) -> Vec<ViewDef> {
    let digest = host.digest();
    let host_name = quote_literal(host.name());

    // Live contact bindings registered through this host. Two names for the
    // same query: `psc_` is the short form dialplans reference, the
    // `ps_contacts_` form predates it and is still read by older dialplans.
    let contacts_query = format!(
        "SELECT * FROM ps_contacts WHERE regserver = \
         (SELECT ipaddr FROM iaxfriends WHERE name = {host_name})"
    );

    vec![
        ViewDef::new(format!("psc_{digest}"), &contacts_query, ViewScope::AllHosts),
        ViewDef::new(
            format!("ps_contacts_{digest}"),
            &contacts_query,
            ViewScope::AllHosts,
        ),
        ViewDef::new(
            "ps_endpoints_internal",
            "SELECT ps_endpoints.* FROM ps_endpoints WHERE context = 'internal'",
            ViewScope::AllHosts,
        ),
        ViewDef::new(
            "ps_aors_internal",
            "SELECT ps_aors.* FROM ps_aors \
             INNER JOIN ps_endpoints ON ps_aors.id = ps_endpoints.aors \
             WHERE ps_endpoints.context = 'internal'",
            ViewScope::AllHosts,
        ),
        ViewDef::new(
            format!("ps_endpoints_external_{digest}"),
            format!(
                "SELECT ps_endpoints.* FROM ps_endpoints \
                 INNER JOIN ps_endpoints_has_iaxfriends AS X ON X.ps_endpoints_id = ps_endpoints.id \
                 INNER JOIN iaxfriends AS Y ON X.iaxfriends_id = Y.id \
                 WHERE ps_endpoints.context = 'external' AND Y.name = {host_name}"
            ),
            ViewScope::Upstream,
        ),
        ViewDef::new(
            format!("ps_regs_{digest}"),
            format!(
                "SELECT ps_registrations.* FROM ps_endpoints_has_iaxfriends \
                 INNER JOIN ps_registrations ON ps_registrations.id = ps_endpoints_has_iaxfriends.ps_endpoints_id \
                 INNER JOIN iaxfriends ON ps_endpoints_has_iaxfriends.iaxfriends_id = iaxfriends.id \
                 WHERE iaxfriends.name = {host_name}"
            ),
            ViewScope::Upstream,
        ),
        ViewDef::new(
            format!("ps_aors_{digest}"),
            format!(
                "SELECT ps_aors.* FROM ps_aors \
                 INNER JOIN ps_endpoints AS Z ON Z.aors = ps_aors.id \
                 INNER JOIN ps_endpoints_has_iaxfriends AS X ON X.ps_endpoints_id = Z.id \
                 INNER JOIN iaxfriends AS Y ON X.iaxfriends_id = Y.id \
                 WHERE Z.context = 'external' AND Y.name = {host_name}"
            ),
            ViewScope::Upstream,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream() -> HostIdentity {
        HostIdentity::from_name("upstream-01")
    }

    fn internal() -> HostIdentity {
        HostIdentity::from_name("pbx-internal-02")
    }

    #[test]
    fn test_catalog_order_and_names() {
        let host = upstream();
        let digest = host.digest();
        let names: Vec<String> = view_defs(&host).into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec![
                format!("psc_{digest}"),
                format!("ps_contacts_{digest}"),
                "ps_endpoints_internal".to_string(),
                "ps_aors_internal".to_string(),
                format!("ps_endpoints_external_{digest}"),
                format!("ps_regs_{digest}"),
                format!("ps_aors_{digest}"),
            ]
        );
    }

    #[test]
    fn test_catalog_is_deterministic() {
        let host = upstream();
        assert_eq!(view_defs(&host), view_defs(&host));
    }

    #[test]
    fn test_scopes() {
        let defs = view_defs(&upstream());
        let scopes: Vec<ViewScope> = defs.iter().map(|d| d.scope).collect();
        assert_eq!(
            scopes,
            vec![
                ViewScope::AllHosts,
                ViewScope::AllHosts,
                ViewScope::AllHosts,
                ViewScope::AllHosts,
                ViewScope::Upstream,
                ViewScope::Upstream,
                ViewScope::Upstream,
            ]
        );
    }

    #[test]
    fn test_upstream_views_excluded_on_internal_hosts() {
        let host = internal();
        let applicable: Vec<ViewDef> = view_defs(&host)
            .into_iter()
            .filter(|d| d.applies_to(&host))
            .collect();
        assert_eq!(applicable.len(), 4);
        assert!(applicable.iter().all(|d| d.scope == ViewScope::AllHosts));
    }

    #[test]
    fn test_upstream_views_included_on_upstream_hosts() {
        let host = upstream();
        let applicable = view_defs(&host)
            .into_iter()
            .filter(|d| d.applies_to(&host))
            .count();
        assert_eq!(applicable, 7);
    }

    #[test]
    fn test_fixed_view_sql_text() {
        let defs = view_defs(&internal());
        assert_eq!(
            defs[2].create_sql(),
            "CREATE VIEW ps_endpoints_internal AS SELECT ps_endpoints.* \
             FROM ps_endpoints WHERE context = 'internal'"
        );
        assert_eq!(
            defs[3].create_sql(),
            "CREATE VIEW ps_aors_internal AS SELECT ps_aors.* FROM ps_aors \
             INNER JOIN ps_endpoints ON ps_aors.id = ps_endpoints.aors \
             WHERE ps_endpoints.context = 'internal'"
        );
    }

    #[test]
    fn test_hostname_embedded_as_quoted_literal() {
        let host = upstream();
        let defs = view_defs(&host);
        assert!(defs[0].query.ends_with("WHERE name = 'upstream-01')"));
        assert!(defs[4].query.ends_with("AND Y.name = 'upstream-01'"));
        assert!(defs[5].query.ends_with("WHERE iaxfriends.name = 'upstream-01'"));
    }

    #[test]
    fn test_hostile_hostname_cannot_break_out_of_literal() {
        let host = HostIdentity::from_name("evil'); DROP TABLE ps_endpoints; --");
        for def in view_defs(&host) {
            assert!(!def.query.contains("evil');"));
            assert!(def.query.contains("evil\\');") || !def.query.contains("evil"));
        }
    }

    #[test]
    fn test_probe_sql_shape() {
        let defs = view_defs(&internal());
        assert_eq!(
            defs[2].probe_sql(),
            "SELECT id FROM ps_endpoints_internal LIMIT 1"
        );
    }

    #[test]
    fn test_contact_views_share_one_query() {
        let defs = view_defs(&upstream());
        assert_eq!(defs[0].query, defs[1].query);
        assert_ne!(defs[0].name, defs[1].name);
    }
}
