use crate::domain::ContentNode;

/// One eligibility rule for sitemap inclusion.
pub trait NodePolicy: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_eligible(&self, node: &ContentNode) -> bool;
}

// pages without a template have nothing to render, so a crawler would hit a 404
pub struct HasTemplate;

impl NodePolicy for HasTemplate {
    fn name(&self) -> &'static str {
        "has-template"
    }

    fn is_eligible(&self, node: &ContentNode) -> bool {
        node.has_template()
    }
}

pub struct Published;

impl NodePolicy for Published {
    fn name(&self) -> &'static str {
        "published"
    }

    fn is_eligible(&self, node: &ContentNode) -> bool {
        node.published
    }
}

pub struct NotHidden;

impl NodePolicy for NotHidden {
    fn name(&self) -> &'static str {
        "not-hidden"
    }

    fn is_eligible(&self, node: &ContentNode) -> bool {
        !node.hide_from_sitemap
    }
}

// any closure works as an ad-hoc policy, e.g. robots rules
impl<F> NodePolicy for (&'static str, F)
where
    F: Fn(&ContentNode) -> bool + Send + Sync,
{
    fn name(&self) -> &'static str {
        self.0
    }

    fn is_eligible(&self, node: &ContentNode) -> bool {
        (self.1)(node)
    }
}
