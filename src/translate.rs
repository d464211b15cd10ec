use crate::{
    attrs::{encode_attributes, Arguments},
    convert::{hash_to_string, time_to_unix_nanos},
    models::{
        AnyValue, Envelope, ErrorData, ExceptionData, KeyValue, StackFrame, StackTrace, Value,
        ATTR_ERROR_MESSAGE, ATTR_ERROR_OBJECT, ERROR_DATA_TYPE_URL, EVENT_ERROR,
    },
    throwable::Throwable,
    Error, Translator,
};
use log::debug;
use md5::{Digest, Md5};
use std::time::SystemTime;
use uuid::Uuid;

impl Translator {
    /// Translate an exception chain into an error event envelope.
    ///
    /// Walks the cause chain starting at `source`, canonicalizes every node
    /// and attaches the chain-level hashes and the caller-supplied arguments
    /// to the embedded record. The envelope is either returned complete or
    /// not at all; nothing is partially emitted.
    pub fn translate(
        &self,
        source: &dyn Throwable,
        arguments: Option<&Arguments>,
    ) -> Result<Envelope, Error> {
        let time_unix_nano = time_to_unix_nanos(SystemTime::now());
        let error_data = self.build_error_data(source, arguments);
        let payload = serde_json::to_vec(&error_data).map_err(Error::SerializeErrorData)?;
        Ok(Envelope {
            kind: EVENT_ERROR.into(),
            time_unix_nano,
            attributes: vec![
                KeyValue::new(ATTR_ERROR_MESSAGE, construct_message(source)),
                KeyValue::new(
                    ATTR_ERROR_OBJECT,
                    AnyValue {
                        type_url: ERROR_DATA_TYPE_URL.into(),
                        value: payload,
                    },
                ),
            ],
        })
    }

    fn build_error_data(&self, source: &dyn Throwable, arguments: Option<&Arguments>) -> ErrorData {
        let mut instance = Md5::new();
        let mut issue = Md5::new();
        let mut exceptions = Vec::new();
        let mut stack_trace_hash = String::new();

        // A node's record is finalized only once the next node's id exists,
        // so emission trails the walk by one step.
        let mut pending: Option<ExceptionData> = None;
        let mut node = Some(source);
        let mut head = true;
        while let Some(current) = node {
            let id = Uuid::new_v4().to_string();
            if let Some(mut previous) = pending.take() {
                previous.cause_id = Some(id.clone());
                exceptions.push(previous);
            }
            let (stack, trace_digest) = self.build_stack_trace(current.frames());
            if head {
                update_chain_hashes(current, &mut instance, &mut issue);
                stack_trace_hash = hash_to_string(trace_digest);
                head = false;
            }
            pending = Some(ExceptionData {
                id,
                message: non_empty(current.message()),
                type_name: current.type_name().to_owned(),
                cause_id: None,
                stack,
            });
            node = next_node(current);
        }
        exceptions.extend(pending);

        if let Some(arguments) = arguments {
            for (key, value) in arguments {
                let Some(value) = value else { continue };
                instance.update(key.as_bytes());
                update_value_hash(&mut instance, value);
            }
        }

        ErrorData {
            message: non_empty(source.message()),
            exceptions,
            arguments: arguments.map(encode_attributes).unwrap_or_default(),
            instance_hash: hash_to_string(instance),
            issue_hash: hash_to_string(issue),
            stack_trace_hash,
        }
    }

    fn build_stack_trace(&self, frames: &[StackFrame]) -> (StackTrace, Md5) {
        let mut digest = Md5::new();
        let retained = frames.len().min(self.max_frames);
        for frame in &frames[..retained] {
            digest.update(frame.to_string().as_bytes());
        }
        let stack = StackTrace {
            frames: frames[..retained].to_vec(),
            dropped_count: (frames.len() - retained) as u64,
        };
        (stack, digest)
    }
}

fn construct_message(throwable: &dyn Throwable) -> String {
    match non_empty(throwable.message()) {
        Some(message) => message,
        None => throwable.type_name().to_owned(),
    }
}

fn non_empty(message: Option<&str>) -> Option<String> {
    message.filter(|m| !m.is_empty()).map(str::to_owned)
}

/// The next node in the chain, or `None` at its end.
///
/// Wrapping adapters step to their wrapped failure directly, bypassing the
/// generic cause slot. A next node reference-identical to the current one
/// terminates the chain instead of looping.
fn next_node<'a>(throwable: &'a dyn Throwable) -> Option<&'a dyn Throwable> {
    let next = throwable.wrapped_cause().or_else(|| throwable.cause())?;
    if same_object(next, throwable) {
        None
    } else {
        Some(next)
    }
}

fn same_object(a: &dyn Throwable, b: &dyn Throwable) -> bool {
    // Compare data pointers only. Vtable pointers are not stable enough to
    // take part in identity.
    std::ptr::eq(
        a as *const dyn Throwable as *const u8,
        b as *const dyn Throwable as *const u8,
    )
}

/// Feed the chain head into the instance and issue digests.
///
/// Both receive the type name and the top frame; the message goes into the
/// instance digest only, so occurrences with varying data still collapse to
/// one issue.
fn update_chain_hashes(head: &dyn Throwable, instance: &mut Md5, issue: &mut Md5) {
    let type_name = head.type_name();
    instance.update(type_name.as_bytes());
    issue.update(type_name.as_bytes());
    match head.frames().first() {
        Some(frame) => {
            let frame = frame.to_string();
            instance.update(frame.as_bytes());
            issue.update(frame.as_bytes());
        }
        // Tolerated degradation: the top-frame contribution becomes the
        // empty string.
        None => debug!("no stack frames on {type_name}, hashing without a top frame"),
    }
    if let Some(message) = head.message().filter(|m| !m.is_empty()) {
        instance.update(message.as_bytes());
    }
}

fn update_value_hash(digest: &mut Md5, value: &Value) {
    match value {
        Value::String(value) => digest.update(value.as_bytes()),
        Value::Int(value) => digest.update(value.to_be_bytes()),
        Value::Double(value) => digest.update(value.to_be_bytes()),
        Value::Bool(value) => digest.update(u64::from(*value).to_be_bytes()),
        Value::Any(value) => digest.update(&value.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::throwable::CapturedException;

    fn head_exception() -> CapturedException {
        CapturedException::new("acme::AppError")
            .with_message("boom")
            .with_frame(StackFrame::new("acme", "server::handle", "server.rs", 42))
    }

    fn error_data(envelope: &Envelope) -> ErrorData {
        envelope.error_data().expect("translated an error event")
    }

    #[test]
    fn single_node_known_hashes() {
        // Digest inputs: "acme::AppError", "acme::server::handle(server.rs:42)"
        // and, for the instance hash, "boom".
        let envelope = Translator::new().translate(&head_exception(), None).unwrap();
        let record = error_data(&envelope);
        assert_eq!("55561e5921c4dd49cb20962cff0e7ce4", record.instance_hash);
        assert_eq!("202cdecea2504edf565c2cec89c9cb4a", record.issue_hash);
        assert_eq!("b44813c5bd8fef640791e284fbe462dd", record.stack_trace_hash);
    }

    #[test]
    fn missing_message_leaves_instance_and_issue_hash_equal() {
        let throwable = CapturedException::new("acme::AppError")
            .with_frame(StackFrame::new("acme", "server::handle", "server.rs", 42));
        let record = error_data(&Translator::new().translate(&throwable, None).unwrap());
        assert_eq!(record.instance_hash, record.issue_hash);
        assert_eq!("202cdecea2504edf565c2cec89c9cb4a", record.issue_hash);
    }

    #[test]
    fn chain_nodes_link_by_cause_id() {
        let throwable = CapturedException::new("a::Outer")
            .with_frame(StackFrame::new("a", "f", "a.rs", 1))
            .with_cause(
                CapturedException::new("b::Middle")
                    .with_frame(StackFrame::new("b", "g", "b.rs", 2))
                    .with_cause(
                        CapturedException::new("c::Inner")
                            .with_frame(StackFrame::new("c", "h", "c.rs", 3)),
                    ),
            );
        let record = error_data(&Translator::new().translate(&throwable, None).unwrap());
        assert_eq!(3, record.exceptions.len());
        assert_eq!("a::Outer", record.exceptions[0].type_name);
        assert_eq!("b::Middle", record.exceptions[1].type_name);
        assert_eq!("c::Inner", record.exceptions[2].type_name);
        for window in record.exceptions.windows(2) {
            assert_eq!(window[0].cause_id.as_ref(), Some(&window[1].id));
        }
        assert_eq!(None, record.exceptions[2].cause_id);
    }

    #[test]
    fn later_nodes_do_not_perturb_chain_hashes() {
        let single = error_data(&Translator::new().translate(&head_exception(), None).unwrap());
        let chained = head_exception().with_cause(
            CapturedException::new("db::Inner")
                .with_message("row missing")
                .with_frame(StackFrame::new("db", "query", "db.rs", 7)),
        );
        let chained = error_data(&Translator::new().translate(&chained, None).unwrap());
        assert_eq!(2, chained.exceptions.len());
        assert_eq!(single.instance_hash, chained.instance_hash);
        assert_eq!(single.issue_hash, chained.issue_hash);
        assert_eq!(single.stack_trace_hash, chained.stack_trace_hash);
    }

    #[test]
    fn wrapped_cause_bypasses_generic_cause_slot() {
        let wrapped = CapturedException::new("db::Inner")
            .with_message("row missing")
            .with_frame(StackFrame::new("db", "query", "db.rs", 7));
        let synthetic = CapturedException::new("adapter::Synthetic")
            .with_frame(StackFrame::new("adapter", "invoke", "adapter.rs", 1));
        let throwable = CapturedException::new("adapter::InvocationError")
            .with_frame(StackFrame::new("adapter", "call", "adapter.rs", 9))
            .with_cause(synthetic)
            .with_wrapped(wrapped);
        let record = error_data(&Translator::new().translate(&throwable, None).unwrap());
        assert_eq!(2, record.exceptions.len());
        assert_eq!("adapter::InvocationError", record.exceptions[0].type_name);
        assert_eq!("db::Inner", record.exceptions[1].type_name);
    }

    #[test]
    fn self_referential_cause_terminates() {
        struct SelfCaused {
            frames: Vec<StackFrame>,
        }

        impl Throwable for SelfCaused {
            fn type_name(&self) -> &str {
                "cyclic::Error"
            }

            fn message(&self) -> Option<&str> {
                None
            }

            fn frames(&self) -> &[StackFrame] {
                &self.frames
            }

            fn cause(&self) -> Option<&dyn Throwable> {
                Some(self)
            }
        }

        let throwable = SelfCaused {
            frames: vec![StackFrame::new("cyclic", "spin", "cyclic.rs", 1)],
        };
        let record = error_data(&Translator::new().translate(&throwable, None).unwrap());
        assert_eq!(1, record.exceptions.len());
        assert_eq!(None, record.exceptions[0].cause_id);
    }

    #[test]
    fn long_trace_truncates_and_hashes_retained_frames_only() {
        let frames: Vec<StackFrame> = (0..57)
            .map(|depth| StackFrame::new("deep", format!("level_{depth}"), "deep.rs", depth))
            .collect();
        let throwable = CapturedException::new("deep::Recursion").with_frames(frames.clone());
        let record = error_data(&Translator::new().translate(&throwable, None).unwrap());
        let stack = &record.exceptions[0].stack;
        assert_eq!(50, stack.frames.len());
        assert_eq!(7, stack.dropped_count);
        assert_eq!(frames[..50], stack.frames[..]);

        // Hash over exactly the retained prefix matches.
        let retained =
            CapturedException::new("deep::Recursion").with_frames(frames[..50].to_vec());
        let retained = error_data(&Translator::new().translate(&retained, None).unwrap());
        assert_eq!(retained.stack_trace_hash, record.stack_trace_hash);
    }

    #[test]
    fn custom_frame_limit_is_honored() {
        let translator = Translator::with_max_frames(2).unwrap();
        let throwable = CapturedException::new("deep::Recursion").with_frames(
            (0..5)
                .map(|depth| StackFrame::new("deep", format!("level_{depth}"), "deep.rs", depth))
                .collect(),
        );
        let record = error_data(&translator.translate(&throwable, None).unwrap());
        let stack = &record.exceptions[0].stack;
        assert_eq!(2, stack.frames.len());
        assert_eq!(3, stack.dropped_count);
    }

    #[test]
    fn zero_frame_limit_is_rejected() {
        assert!(matches!(
            Translator::with_max_frames(0),
            Err(Error::InvalidMaxFrames)
        ));
    }

    #[test]
    fn empty_stack_trace_degrades_without_failing() {
        let throwable = CapturedException::new("acme::AppError").with_message("boom");
        let record = error_data(&Translator::new().translate(&throwable, None).unwrap());
        assert_eq!(1, record.exceptions.len());
        assert!(record.exceptions[0].stack.frames.is_empty());
        // Empty digest over zero retained frames.
        assert_eq!("d41d8cd98f00b204e9800998ecf8427e", record.stack_trace_hash);
        assert_ne!(record.instance_hash, record.issue_hash);
    }

    #[test]
    fn translation_is_deterministic_except_for_ids() {
        let translator = Translator::new();
        let mut arguments = Arguments::new();
        arguments.insert("attempt".into(), Some(Value::Int(3)));
        let first = error_data(
            &translator
                .translate(&head_exception(), Some(&arguments))
                .unwrap(),
        );
        let second = error_data(
            &translator
                .translate(&head_exception(), Some(&arguments))
                .unwrap(),
        );
        assert_eq!(first.instance_hash, second.instance_hash);
        assert_eq!(first.issue_hash, second.issue_hash);
        assert_eq!(first.stack_trace_hash, second.stack_trace_hash);
        assert_ne!(first.exceptions[0].id, second.exceptions[0].id);
    }

    #[test]
    fn arguments_extend_instance_hash_only() {
        let without = error_data(&Translator::new().translate(&head_exception(), None).unwrap());
        let mut arguments = Arguments::new();
        arguments.insert("attempt".into(), Some(Value::Int(3)));
        arguments.insert("ignored".into(), None);
        let with = error_data(
            &Translator::new()
                .translate(&head_exception(), Some(&arguments))
                .unwrap(),
        );
        assert_ne!(without.instance_hash, with.instance_hash);
        assert_eq!(without.issue_hash, with.issue_hash);
        assert_eq!(without.stack_trace_hash, with.stack_trace_hash);
        assert_eq!(1, with.arguments.len());
    }

    #[test]
    fn null_arguments_do_not_perturb_the_instance_hash() {
        let mut with_null = Arguments::new();
        with_null.insert("attempt".into(), Some(Value::Int(3)));
        with_null.insert("ignored".into(), None);
        let mut without_null = Arguments::new();
        without_null.insert("attempt".into(), Some(Value::Int(3)));

        let first = error_data(
            &Translator::new()
                .translate(&head_exception(), Some(&with_null))
                .unwrap(),
        );
        let second = error_data(
            &Translator::new()
                .translate(&head_exception(), Some(&without_null))
                .unwrap(),
        );
        assert_eq!(first.instance_hash, second.instance_hash);
        assert_eq!(first.arguments, second.arguments);
    }

    #[test]
    fn summary_falls_back_to_type_name() {
        let throwable = CapturedException::new("acme::AppError")
            .with_frame(StackFrame::new("acme", "server::handle", "server.rs", 42));
        let envelope = Translator::new().translate(&throwable, None).unwrap();
        assert_eq!(Some("acme::AppError"), envelope.summary());

        let envelope = Translator::new().translate(&head_exception(), None).unwrap();
        assert_eq!(Some("boom"), envelope.summary());
    }
}
