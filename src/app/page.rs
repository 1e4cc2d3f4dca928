// src/app/page.rs
// The pure presentation core of the Models page: load-gate, model partitioning,
// and the render plan deciding which page regions are shown. No I/O happens here;
// fetch dispatch and drawing live in app/mod.rs and app/ui respectively.

use crate::app::api::{Capabilities, Model};

/// The load-gate: true when the model list has never completed a load and no
/// fetch is currently in flight. The owning `App` evaluates this once per frame
/// and dispatches a single guarded fetch when it holds; the dispatch flips the
/// status to `FetchingModels` immediately, so the gate cannot fire twice for
/// the same load.
pub fn needs_fetch(initialized: bool, fetching: bool) -> bool {
    !initialized && !fetching
}

/// Splits the model list into `(uploaded, integrated)` subsets.
///
/// A model with a present identifier was uploaded by a user; a model without
/// one is integrated into the platform. Relative order of the input sequence
/// is preserved in both subsets. Recomputed on every frame, never cached.
pub fn partition(models: &[Model]) -> (Vec<&Model>, Vec<&Model>) {
    models.iter().partition(|m| m.id.is_some())
}

/// Which regions of the Models page are visible for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderPlan {
    /// Show only the loading indicator (besides the top bar region decision
    /// this overrides everything else).
    pub loading: bool,
    pub show_built: bool,
    pub show_uploaded: bool,
    pub show_empty_state: bool,
}

impl RenderPlan {
    fn loading_only() -> Self {
        RenderPlan {
            loading: true,
            ..RenderPlan::default()
        }
    }
}

/// Computes the render plan for the Models page.
///
/// Until the first load completes the page shows only the loading indicator.
/// Afterwards: the built list shows iff any integrated model exists, the
/// uploaded list iff any uploaded model exists, and the empty-state
/// call-to-action iff auto-annotation is installed, no uploaded model exists,
/// and neither TF capability is installed. The top bar is always drawn and
/// needs no flag here.
pub fn plan_page(
    initialized: bool,
    _fetching: bool,
    caps: &Capabilities,
    models: &[Model],
) -> RenderPlan {
    if !initialized {
        return RenderPlan::loading_only();
    }

    let (uploaded, integrated) = partition(models);
    RenderPlan {
        loading: false,
        show_built: !integrated.is_empty(),
        show_uploaded: !uploaded.is_empty(),
        show_empty_state: caps.auto_annotation
            && uploaded.is_empty()
            && !caps.tf_annotation
            && !caps.tf_segmentation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(id: Option<u64>, name: &str) -> Model {
        Model {
            id,
            name: name.to_string(),
            framework: None,
            owner: None,
            uploaded_at: None,
            uploaded_local: None,
        }
    }

    fn caps(auto: bool, tf_ann: bool, tf_seg: bool) -> Capabilities {
        Capabilities {
            auto_annotation: auto,
            tf_annotation: tf_ann,
            tf_segmentation: tf_seg,
        }
    }

    #[test]
    fn load_gate_holds_only_before_first_load() {
        assert!(needs_fetch(false, false));
        assert!(!needs_fetch(false, true));
        assert!(!needs_fetch(true, false));
        assert!(!needs_fetch(true, true));
    }

    #[test]
    fn uninitialized_page_plans_loading_only() {
        // Scenario C: nothing loaded yet, nothing in flight.
        let plan = plan_page(false, false, &caps(true, false, false), &[]);
        assert_eq!(plan, RenderPlan::loading_only());
        // Still loading-only while the first fetch is in flight.
        let plan = plan_page(false, true, &caps(true, false, false), &[]);
        assert!(plan.loading);
        assert!(!plan.show_built && !plan.show_uploaded && !plan.show_empty_state);
    }

    #[test]
    fn partition_is_complete_and_order_preserving() {
        let models = vec![
            model(None, "openvino-person"),
            model(Some(5), "custom-a"),
            model(None, "openvino-face"),
            model(Some(2), "custom-b"),
        ];
        let (uploaded, integrated) = partition(&models);
        assert_eq!(uploaded.len() + integrated.len(), models.len());
        assert_eq!(
            uploaded.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            ["custom-a", "custom-b"]
        );
        assert_eq!(
            integrated.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            ["openvino-person", "openvino-face"]
        );
    }

    #[test]
    fn partition_of_empty_list_is_empty() {
        let (uploaded, integrated) = partition(&[]);
        assert!(uploaded.is_empty());
        assert!(integrated.is_empty());
    }

    #[test]
    fn empty_list_with_auto_annotation_shows_empty_state() {
        // Scenario A.
        let plan = plan_page(true, false, &caps(true, false, false), &[]);
        assert!(!plan.loading);
        assert!(!plan.show_built);
        assert!(!plan.show_uploaded);
        assert!(plan.show_empty_state);
    }

    #[test]
    fn mixed_list_shows_both_lists_and_no_empty_state() {
        // Scenario B.
        let models = vec![model(None, "integrated"), model(Some(5), "mine")];
        let plan = plan_page(true, false, &caps(true, false, false), &models);
        assert!(plan.show_built);
        assert!(plan.show_uploaded);
        assert!(!plan.show_empty_state);
    }

    #[test]
    fn empty_state_requires_auto_annotation_capability() {
        // Scenario D: capability gate fails even though no model is uploaded.
        let plan = plan_page(true, false, &caps(false, false, false), &[]);
        assert!(!plan.loading);
        assert!(!plan.show_built && !plan.show_uploaded && !plan.show_empty_state);
    }

    #[test]
    fn empty_state_suppressed_by_tf_capabilities() {
        let plan = plan_page(true, false, &caps(true, true, false), &[]);
        assert!(!plan.show_empty_state);
        let plan = plan_page(true, false, &caps(true, false, true), &[]);
        assert!(!plan.show_empty_state);
    }

    #[test]
    fn empty_state_and_uploaded_list_are_mutually_exclusive() {
        let cases: Vec<Vec<Model>> = vec![
            vec![],
            vec![model(None, "integrated")],
            vec![model(Some(1), "mine")],
            vec![model(None, "integrated"), model(Some(1), "mine")],
        ];
        for models in &cases {
            for auto in [false, true] {
                for tf in [false, true] {
                    let plan = plan_page(true, false, &caps(auto, tf, tf), models);
                    assert!(
                        !(plan.show_empty_state && plan.show_uploaded),
                        "empty state and uploaded list planned together for {:?}",
                        models
                    );
                }
            }
        }
    }

    #[test]
    fn built_list_independent_of_empty_state() {
        // Integrated models alone still allow the call-to-action for uploads.
        let models = vec![model(None, "integrated")];
        let plan = plan_page(true, false, &caps(true, false, false), &models);
        assert!(plan.show_built);
        assert!(plan.show_empty_state);
    }

    #[test]
    fn planning_is_idempotent() {
        let models = vec![model(None, "integrated"), model(Some(7), "mine")];
        let c = caps(true, false, false);
        let first = plan_page(true, false, &c, &models);
        let second = plan_page(true, false, &c, &models);
        assert_eq!(first, second);
    }
}
