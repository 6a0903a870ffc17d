use std::cmp;
use std::ffi;

use gl;
use gl::types::*;

use crate::errors::*;
use crate::shader::prelude::{Dialect, Language, Version as ShaderVersion};

/// Describes the OpenGL context profile.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Profile {
    /// The context uses only future-compatible functions and definitions.
    Core,
    /// The context includes all immediate mode functions and definitions.
    Compatibility,
}

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        match (*self, *other) {
            (Version::GL(a, b), Version::GL(c, d)) | (Version::ES(a, b), Version::ES(c, d)) => {
                Some((a, b).cmp(&(c, d)))
            }
            _ => None,
        }
    }
}

impl Version {
    /// Parses strings like `4.5.0 NVIDIA 390.77` or `OpenGL ES 3.0 Mesa 18.0.5`.
    pub fn from_description(desc: &str) -> Result<Version> {
        let (es, desc) = if desc.starts_with("OpenGL ES-") {
            // `OpenGL ES-CM 1.1` style profiles.
            (true, desc.get(13..).unwrap_or(""))
        } else if desc.starts_with("OpenGL ES ") {
            (true, &desc[10..])
        } else {
            (false, desc)
        };

        let number = desc
            .split(' ')
            .next()
            .ok_or_else(|| format_err!("[GL] Version string '{}' is malformed.", desc))?;

        let mut iter = number.split('.');
        let mut next = || -> Result<u8> {
            iter.next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| format_err!("[GL] Version string '{}' is malformed.", desc))
        };

        let (major, minor) = (next()?, next()?);
        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }

    /// Obtains the OpenGL version of the current context using the loaded functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Version> {
        Version::from_description(&parse_str(gl::VERSION)?)
    }

    /// The shading language dialect the generator should target on this context.
    pub fn dialect(self) -> crate::shader::errors::Result<Dialect> {
        match self {
            Version::GL(major, minor) => {
                Dialect::resolve(Language::Glsl, ShaderVersion::new(major, minor))
            }
            Version::ES(major, minor) => {
                Dialect::resolve(Language::GlslEs, ShaderVersion::new(major, minor))
            }
        }
    }
}

macro_rules! extensions {
    ($($string:expr => $field:ident,)+) => {
        /// Contains data about the list of extensions.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            fn from_names<'a, T: IntoIterator<Item = &'a str>>(names: T) -> Extensions {
                let mut extensions = Extensions::default();
                for name in names {
                    match name {
                        $(
                            $string => extensions.$field = true,
                        )+
                        _ => (),
                    }
                }

                extensions
            }

            /// Returns the list of extensions supported by the current context.
            pub unsafe fn parse(version: Version) -> Result<Extensions> {
                if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
                    let mut num = 0;
                    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num);

                    let mut names = Vec::with_capacity(num as usize);
                    for i in 0..num {
                        let ext = gl::GetStringi(gl::EXTENSIONS, i as GLuint);
                        if !ext.is_null() {
                            names.push(ffi::CStr::from_ptr(ext as *const _).to_string_lossy().into_owned());
                        }
                    }

                    Ok(Extensions::from_names(names.iter().map(|v| v.as_str())))
                } else {
                    let list = parse_str(gl::EXTENSIONS)?;
                    Ok(Extensions::from_names(list.split(' ')))
                }
            }
        }
    }
}

extensions! {
    "GL_ARB_shader_objects" => gl_arb_shader_objects,
    "GL_ARB_vertex_shader" => gl_arb_vertex_shader,
    "GL_ARB_fragment_shader" => gl_arb_fragment_shader,
    "GL_ARB_vertex_buffer_object" => gl_arb_vertex_buffer_object,
    "GL_ARB_uniform_buffer_object" => gl_arb_uniform_buffer_object,
    "GL_ARB_vertex_array_object" => gl_arb_vertex_array_object,
    "GL_APPLE_vertex_array_object" => gl_apple_vertex_array_object,
    "GL_OES_vertex_array_object" => gl_oes_vertex_array_object,
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may follow the version
    /// number.
    pub version: Version,
    /// The company responsible for this GL implementation.
    pub vendor: String,
    /// The name of the renderer. This name is typically specific to a particular
    /// configuration of a hardware platform.
    pub renderer: String,
    pub extensions: Extensions,
    /// The OpenGL context profile if available, from OpenGL 3.2 onwards.
    pub profile: Option<Profile>,
    /// Maximum width and height of `glViewport`.
    pub max_viewport_dims: (u32, u32),
    /// Maximum number of vertex attributes.
    pub max_vertex_attribs: u32,
    /// Maximum number of textures that can be bound to a program.
    pub max_combined_texture_image_units: u32,
}

impl Capabilities {
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse()?;
        let extensions = Extensions::parse(version)?;

        Ok(Capabilities {
            version,
            extensions,
            vendor: parse_str(gl::VENDOR)?,
            renderer: parse_str(gl::RENDERER)?,
            profile: parse_profile(version),
            max_viewport_dims: parse_viewport_dims(),
            max_vertex_attribs: parse_integer(gl::MAX_VERTEX_ATTRIBS),
            max_combined_texture_image_units: parse_integer(gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
        })
    }

    /// Checks that everything the device relies on is available.
    pub fn check(&self) -> Result<()> {
        let v = self.version;
        let ext = &self.extensions;

        if v < Version::GL(1, 5) && v < Version::ES(2, 0) && !ext.gl_arb_vertex_buffer_object {
            bail!("The OpenGL implementation does not supports vertex buffer objects.");
        }

        if v < Version::GL(2, 0)
            && v < Version::ES(2, 0)
            && (!ext.gl_arb_shader_objects
                || !ext.gl_arb_vertex_shader
                || !ext.gl_arb_fragment_shader)
        {
            bail!("The OpenGL implementation does not supports shader objects.");
        }

        if v < Version::GL(3, 0)
            && v < Version::ES(3, 0)
            && !ext.gl_arb_vertex_array_object
            && !ext.gl_apple_vertex_array_object
            && !ext.gl_oes_vertex_array_object
        {
            bail!("The OpenGL implementation does not supports vertex array objects.");
        }

        if self.max_vertex_attribs < 12 {
            bail!(
                "The OpenGL implementation supports only {} vertex attributes.",
                self.max_vertex_attribs
            );
        }

        Ok(())
    }

    /// Whether `glUniformBlockBinding` and friends can be called.
    pub fn has_uniform_buffers(&self) -> bool {
        self.version >= Version::GL(3, 1)
            || self.version >= Version::ES(3, 0)
            || self.extensions.gl_arb_uniform_buffer_object
    }
}

unsafe fn parse_str(id: GLenum) -> Result<String> {
    let s = gl::GetString(id);
    if s.is_null() {
        bail!("[GL] String of {:#x} is null.", id);
    }

    Ok(ffi::CStr::from_ptr(s as *const _)
        .to_string_lossy()
        .into_owned())
}

unsafe fn parse_integer(id: GLenum) -> u32 {
    let mut val = 0;
    gl::GetIntegerv(id, &mut val);
    val.max(0) as u32
}

unsafe fn parse_viewport_dims() -> (u32, u32) {
    let mut val: [GLint; 2] = [0, 0];
    gl::GetIntegerv(gl::MAX_VIEWPORT_DIMS, val.as_mut_ptr());
    (val[0] as u32, val[1] as u32)
}

unsafe fn parse_profile(version: Version) -> Option<Profile> {
    if version >= Version::GL(3, 2) {
        let val = parse_integer(gl::CONTEXT_PROFILE_MASK);
        if (val & gl::CONTEXT_COMPATIBILITY_PROFILE_BIT) != 0 {
            Some(Profile::Compatibility)
        } else if (val & gl::CONTEXT_CORE_PROFILE_BIT) != 0 {
            Some(Profile::Core)
        } else {
            None
        }
    } else {
        None
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn version_strings() {
        assert_eq!(Version::from_description("4.5.0 NVIDIA 390.77").unwrap(), Version::GL(4, 5));
        assert_eq!(Version::from_description("3.3 (Core Profile) Mesa 18.0.5").unwrap(), Version::GL(3, 3));
        assert_eq!(Version::from_description("OpenGL ES 3.0 Mesa 18.0.5").unwrap(), Version::ES(3, 0));
        assert!(Version::from_description("garbage").is_err());

        assert!(Version::GL(3, 3) > Version::GL(3, 1));
        assert!(!(Version::GL(3, 0) >= Version::ES(3, 0)));
        assert!(!(Version::ES(3, 0) >= Version::GL(3, 0)));
    }

    #[test]
    fn dialects() {
        let d = Version::GL(4, 3).dialect().unwrap();
        assert_eq!(d.header(), "#version 430\n");

        let d = Version::ES(3, 0).dialect().unwrap();
        assert_eq!(d.header(), "#version 300 es\n");
    }
}
