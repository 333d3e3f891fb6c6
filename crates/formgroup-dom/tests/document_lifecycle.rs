//! Components mounted in a document see balanced lifecycle callbacks, and
//! subscriptions they hold never outlive their mount.

use std::cell::RefCell;
use std::rc::Rc;

use formgroup_core::{ControlEvent, ControlEventKind};
use formgroup_dom::control::CONTROL_TAGS;
use formgroup_dom::{Component, Control, Document, Element, Listener, Node, Subscription};

/// Minimal component: subscribes to the first control's blur while mounted.
struct BlurCounter {
    content: Element,
    subscription: Option<Subscription>,
    blurs: Rc<RefCell<u32>>,
}

impl Component for BlurCounter {
    fn connected(&mut self) {
        let Some(control) = self.content.query_control(&CONTROL_TAGS) else {
            return;
        };
        let blurs = Rc::clone(&self.blurs);
        let listener: Listener = Rc::new(move |_: &mut ControlEvent| *blurs.borrow_mut() += 1);
        self.subscription = Some(control.subscribe([(ControlEventKind::Blur, listener)]));
    }

    fn disconnected(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

fn counter_around(control: &Control) -> Rc<RefCell<BlurCounter>> {
    Rc::new(RefCell::new(BlurCounter {
        content: Element::new("div").with_child(Node::from(control.clone())),
        subscription: None,
        blurs: Rc::new(RefCell::new(0)),
    }))
}

#[test]
fn mount_cycles_keep_one_subscription() {
    let input = Control::text_input();
    let counter = counter_around(&input);
    let mut doc = Document::new();

    for _ in 0..5 {
        let id = doc.mount(counter.clone());
        assert_eq!(input.listener_count(ControlEventKind::Blur), 1);
        input.blur();
        doc.unmount(id);
        assert_eq!(input.listener_count(ControlEventKind::Blur), 0);
        input.blur();
    }
    assert_eq!(*counter.borrow().blurs.borrow(), 5);
}

#[test]
fn two_components_on_one_control_are_independent() {
    let input = Control::text_input();
    let a = counter_around(&input);
    let b = counter_around(&input);
    let mut doc = Document::new();

    let id_a = doc.mount(a.clone());
    doc.mount(b.clone());
    input.blur();
    doc.unmount(id_a);
    input.blur();

    assert_eq!(*a.borrow().blurs.borrow(), 1);
    assert_eq!(*b.borrow().blurs.borrow(), 2);
    assert_eq!(input.total_listeners(), 1);
}
